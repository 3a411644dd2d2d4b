// ==========================================
// 课表排课引擎 - 引擎层
// ==========================================
// 职责: 设施匹配 / 冲突校验 / 单日分配 / 周期编排 / 统计 / 查询
// 红线: 引擎不做 I/O（配置经由 EngineConfigReader 注入），不修改输入
// ==========================================

pub mod allocator;
pub mod day_view;
pub mod feature_match;
pub mod orchestrator;
pub mod query;
pub mod stats;
pub mod validator;

// 重导出核心引擎
pub use allocator::DayAllocator;
pub use day_view::{DayStage, DaySummary, DayView, EnrichedClass};
pub use feature_match::FeatureMatcher;
pub use orchestrator::{merge_updates, Period, PeriodOrchestrator, PeriodRun};
pub use query::{candidate_assignments, find_room_conflicts, free_slots_for_room, nest_by_day, ClassFilter};
pub use stats::{CacheStats, StatsCache, TimetableStats, TimetableStatsAnalyzer};
pub use validator::{AssignmentValidator, ValidationErrors};
