// ==========================================
// 课表排课引擎 - 单日课表视图
// ==========================================
// 职责: 校验星期 → 选取当天时间段 → 选取当天课程 → 补充名称 → 汇总
// 输出: DayView（含每一步的中间结果，供展示）
// 红线: 只读，不修改快照
// ==========================================

use crate::domain::snapshot::Snapshot;
use crate::domain::timetable::{Class, Slot};
use crate::domain::types::{parse_weekday, weekday_name};
use crate::error::{EngineError, EngineResult};
use chrono::Weekday;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// 无教师课程在负载统计中的归类键
pub const UNASSIGNED_TEACHER: &str = "UNASSIGNED";

// ==========================================
// DayView 结构
// ==========================================

/// 补充了展示名称的课程
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedClass {
    #[serde(flatten)]
    pub class: Class,
    pub room_name: String,
    pub course_title: String,
    pub teacher_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub slots_total: usize,
    pub slots_occupied: usize,
    pub classes_count: usize,
    pub teacher_load: BTreeMap<String, usize>,
}

/// 构建过程的中间结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum DayStage {
    ValidatedDay { day: String },
    Slots { slot_ids: Vec<String> },
    Classes { class_ids: Vec<String> },
    EnrichedClasses { count: usize },
    Summary { summary: DaySummary },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub day: String,
    pub slots: Vec<Slot>,
    pub classes: Vec<EnrichedClass>,
    pub summary: DaySummary,
    pub stages: Vec<DayStage>,
}

impl DayView {
    /// 构建单日视图
    ///
    /// # 参数
    /// - raw_day: 星期名称（大小写不敏感，支持三字母缩写）
    /// - snapshot: 数据快照
    /// - working_days: 允许查看的星期
    ///
    /// # 返回
    /// - Err(InvalidDay): 无法识别或不在工作日内
    pub fn build(raw_day: &str, snapshot: &Snapshot, working_days: &[Weekday]) -> EngineResult<DayView> {
        let mut stages = Vec::new();

        // 1. 校验星期
        let day = weekday_name(validate_day(raw_day, working_days)?).to_string();
        stages.push(DayStage::ValidatedDay { day: day.clone() });

        // 2. 当天时间段
        let slots: Vec<Slot> = snapshot.slots.iter().filter(|s| s.is_on(&day)).cloned().collect();
        stages.push(DayStage::Slots {
            slot_ids: slots.iter().map(|s| s.id.clone()).collect(),
        });

        // 3. 当天课程
        let slot_ids: HashSet<&str> = slots.iter().map(|s| s.id.as_str()).collect();
        let classes: Vec<&Class> = snapshot
            .classes
            .iter()
            .filter(|c| c.slot().is_some_and(|id| slot_ids.contains(id)))
            .collect();
        stages.push(DayStage::Classes {
            class_ids: classes.iter().map(|c| c.id.clone()).collect(),
        });

        // 4. 补充名称
        let enriched = enrich_classes(&classes, snapshot);
        stages.push(DayStage::EnrichedClasses { count: enriched.len() });

        // 5. 汇总
        let summary = summarize_day(&classes, &slots);
        stages.push(DayStage::Summary {
            summary: summary.clone(),
        });

        debug!(
            day = %day,
            slots_total = summary.slots_total,
            classes_count = summary.classes_count,
            "单日视图构建完成"
        );

        Ok(DayView {
            day,
            slots,
            classes: enriched,
            summary,
            stages,
        })
    }
}

/// 校验星期名称
pub fn validate_day(raw_day: &str, working_days: &[Weekday]) -> EngineResult<Weekday> {
    match parse_weekday(raw_day) {
        Some(day) if working_days.contains(&day) => Ok(day),
        _ => Err(EngineError::InvalidDay(raw_day.to_string())),
    }
}

fn enrich_classes(classes: &[&Class], snapshot: &Snapshot) -> Vec<EnrichedClass> {
    let rooms: HashMap<&str, &str> = snapshot.rooms.iter().map(|r| (r.id.as_str(), r.name.as_str())).collect();
    let courses: HashMap<&str, &str> = snapshot
        .courses
        .iter()
        .map(|c| (c.code.as_str(), c.title.as_str()))
        .collect();
    let teachers: HashMap<&str, &str> = snapshot
        .teachers
        .iter()
        .map(|t| (t.id.as_str(), t.name.as_str()))
        .collect();

    classes
        .iter()
        .map(|class| EnrichedClass {
            class: (*class).clone(),
            room_name: class
                .room()
                .and_then(|id| rooms.get(id))
                .map(|s| s.to_string())
                .unwrap_or_default(),
            course_title: courses
                .get(class.course_id.as_str())
                .map(|s| s.to_string())
                .unwrap_or_default(),
            teacher_name: teachers
                .get(class.teacher_id.as_str())
                .map(|s| s.to_string())
                .unwrap_or_default(),
        })
        .collect()
}

fn summarize_day(classes: &[&Class], slots: &[Slot]) -> DaySummary {
    let occupied: HashSet<&str> = classes.iter().filter_map(|c| c.slot()).collect();

    let mut teacher_load: BTreeMap<String, usize> = BTreeMap::new();
    for class in classes {
        let key = if class.teacher_id.is_empty() {
            UNASSIGNED_TEACHER
        } else {
            class.teacher_id.as_str()
        };
        *teacher_load.entry(key.to_string()).or_insert(0) += 1;
    }

    DaySummary {
        slots_total: slots.len(),
        slots_occupied: occupied.len(),
        classes_count: classes.len(),
        teacher_load,
    }
}
