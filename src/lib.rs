// ==========================================
// 课表排课引擎 - 核心库
// ==========================================
// 技术栈: Rust + Tokio + SQLite（仅配置）
// 系统定位: 贪心排课 + 冲突校验 + 课表统计
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排课规则
pub mod engine;

// 配置层 - 引擎配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ClassStatus, ErrorCategory};

// 领域实体
pub use domain::{
    Building, Class, Collision, Course, DayOutcome, DayReport, Group, MonthReport, Needs,
    PeriodAggregate, PeriodReport, Room, Slot, Snapshot, Teacher,
};

// 引擎
pub use engine::{
    AssignmentValidator, DayAllocator, DayView, Period, PeriodOrchestrator, PeriodRun, StatsCache,
    TimetableStats, TimetableStatsAnalyzer, ValidationErrors,
};

// 配置
pub use config::{ConfigManager, EngineConfig, EngineConfigReader};

// 错误
pub use error::{EngineError, EngineResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "课表排课引擎";
