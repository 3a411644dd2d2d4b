// ==========================================
// 课表排课引擎 - 引擎层错误类型
// ==========================================
// 职责: 统一引擎/配置/快照加载的错误类型
// 工具: thiserror 派生宏
// 说明: 校验失败与未排课程不是错误，分别以结果值/报告返回
// ==========================================

use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 周期选择错误 =====
    #[error("无法识别的星期: {0}")]
    InvalidDay(String),

    #[error("排课周期为空: 至少需要一天")]
    EmptyPeriod,

    #[error("无效的排课周期: {0}")]
    InvalidPeriod(String),

    // ===== 配置存储错误 =====
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("锁获取失败: {0}")]
    Lock(String),

    // ===== 快照错误 =====
    #[error("快照解析失败: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    // ===== 并发执行错误 =====
    #[error("单日排课任务异常退出: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
