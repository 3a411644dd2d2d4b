// ==========================================
// 课表排课引擎 - 排课报告领域模型
// ==========================================
// 职责: 单日排课报告 / 冲突记录 / 周期汇总
// 序列化: 字段名与外部调用方约定一致
// ==========================================

use crate::domain::timetable::Class;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Collision - 冲突记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Collision {
    /// 同一 (时间段, 教室) 被多节课占用
    RoomConflict {
        slot_id: String,
        room_id: String,
        classes: [String; 2],
    },
    /// 同一教师在同一时间段有多节课
    TeacherConflict {
        slot_id: String,
        teacher_id: String,
        classes: [String; 2],
    },
}

// ==========================================
// DayReport - 单日排课报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayReport {
    pub day: String,
    pub scheduled_count: usize,   // 本次输出中已有时间段的课程数
    pub assigned_this_run: usize, // 本次新落位数
    pub unscheduled_count: usize, // 本次输出中仍未排的课程数
    pub collisions: Vec<Collision>,
    pub assigned_ids: Vec<String>,
    pub unassigned_ids: Vec<String>,
}

// ==========================================
// DayOutcome - 单日排课结果（课程快照 + 报告）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayOutcome {
    pub day: String,
    pub classes: Vec<Class>,
    pub report: DayReport,
}

// ==========================================
// PeriodAggregate - 周期汇总
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub total_days: usize,
    pub total_scheduled: usize,
    pub total_assigned_this_run: usize,
    pub total_unscheduled: usize,
    pub total_collisions: usize,
}

impl PeriodAggregate {
    /// 由单日报告累加
    pub fn from_reports<'a, I>(reports: I) -> Self
    where
        I: IntoIterator<Item = &'a DayReport>,
    {
        reports.into_iter().fold(Self::default(), |mut acc, report| {
            acc.absorb(report);
            acc
        })
    }

    /// 累加一份单日报告
    pub fn absorb(&mut self, report: &DayReport) {
        self.total_days += 1;
        self.total_scheduled += report.scheduled_count;
        self.total_assigned_this_run += report.assigned_this_run;
        self.total_unscheduled += report.unscheduled_count;
        self.total_collisions += report.collisions.len();
    }

    /// 合并另一份汇总（月度汇总用）
    pub fn merge(&mut self, other: &PeriodAggregate) {
        self.total_days += other.total_days;
        self.total_scheduled += other.total_scheduled;
        self.total_assigned_this_run += other.total_assigned_this_run;
        self.total_unscheduled += other.total_unscheduled;
        self.total_collisions += other.total_collisions;
    }
}

// ==========================================
// PeriodReport - 周期排课报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub days: Vec<DayOutcome>,
    pub aggregate: PeriodAggregate,
}

impl PeriodReport {
    pub fn new(days: Vec<DayOutcome>) -> Self {
        let aggregate = PeriodAggregate::from_reports(days.iter().map(|d| &d.report));
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            days,
            aggregate,
        }
    }
}

// ==========================================
// MonthReport - 月度报告（重复周期运行）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub repetitions: Vec<PeriodReport>,
    pub aggregate: PeriodAggregate,
    /// 按课程ID合并后的课表（后一次覆盖前一次）
    pub merged_classes: Vec<Class>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(scheduled: usize, assigned: usize, unscheduled: usize, collisions: usize) -> DayReport {
        DayReport {
            day: "monday".to_string(),
            scheduled_count: scheduled,
            assigned_this_run: assigned,
            unscheduled_count: unscheduled,
            collisions: (0..collisions)
                .map(|i| Collision::RoomConflict {
                    slot_id: "MON1".to_string(),
                    room_id: "R01".to_string(),
                    classes: [format!("A{}", i), format!("B{}", i)],
                })
                .collect(),
            assigned_ids: vec![],
            unassigned_ids: vec![],
        }
    }

    #[test]
    fn test_aggregate_sums_reports() {
        let reports = vec![report(3, 2, 1, 0), report(4, 1, 0, 1)];
        let agg = PeriodAggregate::from_reports(&reports);
        assert_eq!(agg.total_days, 2);
        assert_eq!(agg.total_scheduled, 7);
        assert_eq!(agg.total_assigned_this_run, 3);
        assert_eq!(agg.total_unscheduled, 1);
        assert_eq!(agg.total_collisions, 1);
    }

    #[test]
    fn test_collision_serialized_shape() {
        let collision = Collision::TeacherConflict {
            slot_id: "MON1".to_string(),
            teacher_id: "T1".to_string(),
            classes: ["C1".to_string(), "C2".to_string()],
        };
        let value = serde_json::to_value(&collision).unwrap();
        assert_eq!(value["type"], "teacher_conflict");
        assert_eq!(value["teacher_id"], "T1");
        assert_eq!(value["classes"][1], "C2");
    }
}
