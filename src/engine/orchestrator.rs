// ==========================================
// 课表排课引擎 - 周期编排器
// ==========================================
// 用途: 按周期（周 / 月 / 自选日）并发执行单日排课并汇总
// 并发: 每天一个 spawn_blocking 任务，join_all 收集，结果保持日序
// 红线: 每天都基于同一份原始快照，天与天之间互不影响
// ==========================================

use crate::config::EngineConfigReader;
use crate::domain::report::{DayOutcome, MonthReport, PeriodAggregate, PeriodReport};
use crate::domain::snapshot::Snapshot;
use crate::domain::timetable::Class;
use crate::domain::types::{parse_weekday, weekday_name};
use crate::engine::allocator::DayAllocator;
use crate::error::{EngineError, EngineResult};
use crate::perf::PerfGuard;
use chrono::{Utc, Weekday};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

// ==========================================
// Period - 排课周期
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    /// 配置的工作日（默认周一至周五）
    Week,
    /// 工作日 × 月度重复次数
    Month,
    /// 自选星期
    Days(Vec<Weekday>),
}

impl Period {
    /// 解析周期
    ///
    /// # 参数
    /// - raw: "week" / "month" / 逗号分隔的星期（如 "monday,wed"）
    ///
    /// # 返回
    /// - Err(InvalidDay): 含无法识别的星期
    /// - Err(EmptyPeriod): 自选星期为空
    pub fn parse(raw: &str) -> EngineResult<Period> {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "week" => return Ok(Period::Week),
            "month" => return Ok(Period::Month),
            _ => {}
        }

        let mut days = Vec::new();
        for token in trimmed.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let day = parse_weekday(token).ok_or_else(|| EngineError::InvalidDay(token.to_string()))?;
            days.push(day);
        }

        if days.is_empty() {
            return Err(EngineError::EmptyPeriod);
        }
        Ok(Period::Days(days))
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
            Period::Days(days) => {
                let names: Vec<&str> = days.iter().map(|d| weekday_name(*d)).collect();
                write!(f, "{}", names.join(","))
            }
        }
    }
}

// ==========================================
// PeriodRun - 周期运行结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodRun {
    Period(PeriodReport),
    Month(MonthReport),
}

impl PeriodRun {
    pub fn aggregate(&self) -> &PeriodAggregate {
        match self {
            PeriodRun::Period(report) => &report.aggregate,
            PeriodRun::Month(report) => &report.aggregate,
        }
    }

    /// 将本次运行的新落位合并回原始课程集合
    pub fn merged_classes(&self, original: &[Class]) -> Vec<Class> {
        match self {
            PeriodRun::Period(report) => merge_updates(original, &report.days),
            PeriodRun::Month(report) => report.merged_classes.clone(),
        }
    }
}

// ==========================================
// PeriodOrchestrator - 周期编排器
// ==========================================
pub struct PeriodOrchestrator<C>
where
    C: EngineConfigReader,
{
    config: Arc<C>,
}

impl<C> PeriodOrchestrator<C>
where
    C: EngineConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器（工作日、月度重复次数）
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 生成周期报告（各天并发执行）
    ///
    /// # 参数
    /// - days: 星期列表（顺序即报告中的日序）
    /// - snapshot: 原始快照（各天共享，只读）
    ///
    /// # 返回
    /// - Err(EmptyPeriod): days 为空
    /// - Err(TaskJoin): 单日任务异常退出
    pub async fn generate_period_report(
        &self,
        days: &[Weekday],
        snapshot: Arc<Snapshot>,
    ) -> EngineResult<PeriodReport> {
        if days.is_empty() {
            return Err(EngineError::EmptyPeriod);
        }
        let _perf = PerfGuard::new("generate_period_report").with_items(snapshot.classes.len());

        info!(
            days_count = days.len(),
            classes_count = snapshot.classes.len(),
            "开始生成周期报告"
        );

        // 完整性问题只告警，不阻断
        let integrity = snapshot.integrity_report();
        for issue in &integrity.issues {
            warn!(issue = %issue, "快照完整性问题");
        }

        let tasks = days.iter().map(|day| {
            let snapshot = Arc::clone(&snapshot);
            let day_name = weekday_name(*day);
            tokio::task::spawn_blocking(move || {
                DayAllocator::new().schedule_day(
                    day_name,
                    &snapshot.classes,
                    &snapshot.rooms,
                    &snapshot.slots,
                    &snapshot.groups,
                )
            })
        });

        let results = join_all(tasks).await;
        let outcomes = results.into_iter().collect::<Result<Vec<DayOutcome>, _>>()?;

        let report = PeriodReport::new(outcomes);
        info!(
            run_id = %report.run_id,
            total_days = report.aggregate.total_days,
            total_assigned = report.aggregate.total_assigned_this_run,
            total_unscheduled = report.aggregate.total_unscheduled,
            total_collisions = report.aggregate.total_collisions,
            "周期报告生成完成"
        );

        Ok(report)
    }

    /// 生成月度报告：同一组星期重复运行 N 次（N 取自配置）
    ///
    /// 每次重复都基于同一份原始快照，互不依赖；重复次数为 0 时返回 InvalidPeriod
    pub async fn generate_month_report(
        &self,
        days: &[Weekday],
        snapshot: Arc<Snapshot>,
    ) -> EngineResult<MonthReport> {
        let repetitions = self.config.get_month_repetitions().await?;
        if repetitions == 0 {
            return Err(EngineError::InvalidPeriod("月度重复次数必须大于 0".to_string()));
        }
        info!(repetitions, days_count = days.len(), "开始生成月度报告");

        let mut reports = Vec::with_capacity(repetitions as usize);
        for _ in 0..repetitions {
            reports.push(self.generate_period_report(days, Arc::clone(&snapshot)).await?);
        }

        let mut aggregate = PeriodAggregate::default();
        for report in &reports {
            aggregate.merge(&report.aggregate);
        }

        let merged_classes = merge_updates(
            &snapshot.classes,
            reports.iter().flat_map(|r| r.days.iter()),
        );

        Ok(MonthReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            repetitions: reports,
            aggregate,
            merged_classes,
        })
    }

    /// 按周期选择执行
    pub async fn run_period(&self, period: &Period, snapshot: Arc<Snapshot>) -> EngineResult<PeriodRun> {
        match period {
            Period::Week => {
                let days = self.config.get_working_days().await?;
                Ok(PeriodRun::Period(self.generate_period_report(&days, snapshot).await?))
            }
            Period::Month => {
                let days = self.config.get_working_days().await?;
                Ok(PeriodRun::Month(self.generate_month_report(&days, snapshot).await?))
            }
            Period::Days(days) => Ok(PeriodRun::Period(self.generate_period_report(days, snapshot).await?)),
        }
    }
}

// ==========================================
// merge_updates - 合并各天的新落位
// ==========================================

/// 将单日结果中本次新落位的课程按 ID 合并回原始集合
///
/// 规则：
/// - 原始顺序保持不变
/// - 只有出现在 `assigned_ids` 中的课程会覆盖原值
/// - 同一课程在多天/多次重复中都有落位时，后出现者覆盖先出现者
pub fn merge_updates<'a, I>(original: &[Class], outcomes: I) -> Vec<Class>
where
    I: IntoIterator<Item = &'a DayOutcome>,
{
    let mut merged: Vec<Class> = original.to_vec();
    let mut position: HashMap<String, usize> = HashMap::new();
    for (index, class) in merged.iter().enumerate() {
        position.entry(class.id.clone()).or_insert(index);
    }

    for outcome in outcomes {
        let assigned: HashSet<&str> = outcome.report.assigned_ids.iter().map(String::as_str).collect();
        for class in outcome.classes.iter().filter(|c| assigned.contains(c.id.as_str())) {
            match position.get(&class.id) {
                Some(&index) => merged[index] = class.clone(),
                None => {
                    position.insert(class.id.clone(), merged.len());
                    merged.push(class.clone());
                }
            }
        }
    }

    merged
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::domain::report::DayReport;
    use crate::domain::timetable::Needs;
    use crate::domain::types::ClassStatus;

    fn class(id: &str) -> Class {
        Class {
            id: id.to_string(),
            course_id: "X".to_string(),
            needs: Needs::None,
            teacher_id: "T1".to_string(),
            group_id: "G1".to_string(),
            slot_id: None,
            room_id: None,
            status: ClassStatus::Planned,
        }
    }

    fn outcome(day: &str, classes: Vec<Class>, assigned: &[&str]) -> DayOutcome {
        DayOutcome {
            day: day.to_string(),
            classes,
            report: DayReport {
                day: day.to_string(),
                assigned_ids: assigned.iter().map(|s| s.to_string()).collect(),
                ..DayReport::default()
            },
        }
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(Period::parse("week").unwrap(), Period::Week);
        assert_eq!(Period::parse(" MONTH ").unwrap(), Period::Month);
        assert_eq!(
            Period::parse("monday, wed").unwrap(),
            Period::Days(vec![Weekday::Mon, Weekday::Wed])
        );
        assert!(matches!(Period::parse("monday,funday"), Err(EngineError::InvalidDay(d)) if d == "funday"));
        assert!(matches!(Period::parse(" , "), Err(EngineError::EmptyPeriod)));
        assert_eq!(Period::Days(vec![Weekday::Tue]).to_string(), "tuesday");
    }

    #[test]
    fn test_merge_keeps_later_assignment() {
        let original = vec![class("A"), class("B")];
        let monday = outcome("monday", vec![class("A").assigned_to("MON1", "R01"), class("B")], &["A"]);
        let tuesday = outcome(
            "tuesday",
            vec![
                class("A").assigned_to("TUE1", "R02"),
                class("B").assigned_to("TUE2", "R01"),
            ],
            &["A", "B"],
        );
        let friday = outcome("friday", vec![class("A"), class("B")], &[]);

        let merged = merge_updates(&original, [&monday, &tuesday, &friday]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].slot(), Some("TUE1"));
        assert_eq!(merged[1].slot(), Some("TUE2"));
    }

    #[tokio::test]
    async fn test_empty_days_rejected() {
        let orchestrator = PeriodOrchestrator::new(Arc::new(EngineConfig::default()));
        let result = orchestrator
            .generate_period_report(&[], Arc::new(Snapshot::default()))
            .await;
        assert!(matches!(result, Err(EngineError::EmptyPeriod)));
    }

    #[tokio::test]
    async fn test_zero_month_repetitions_rejected() {
        let config = EngineConfig {
            month_repetitions: 0,
            ..EngineConfig::default()
        };
        let orchestrator = PeriodOrchestrator::new(Arc::new(config));
        let result = orchestrator
            .run_period(&Period::Month, Arc::new(Snapshot::default()))
            .await;
        assert!(matches!(result, Err(EngineError::InvalidPeriod(_))));
    }
}
