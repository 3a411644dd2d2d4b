// ==========================================
// 课表排课引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、报告结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod report;
pub mod resource;
pub mod snapshot;
pub mod timetable;
pub mod types;

// 重导出核心类型
pub use report::{Collision, DayOutcome, DayReport, MonthReport, PeriodAggregate, PeriodReport};
pub use resource::{Building, Course, Group, Room, Teacher};
pub use snapshot::{IntegrityIssue, IntegrityReport, Snapshot};
pub use timetable::{Class, Constraint, Needs, Slot};
pub use types::{ClassStatus, ErrorCategory};
