// ==========================================
// 课表排课引擎 - 配置层
// ==========================================
// 职责: 引擎配置读取接口 + SQLite/内存两种实现
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config_trait;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config_trait::{EngineConfig, EngineConfigReader, DEFAULT_MONTH_REPETITIONS};
