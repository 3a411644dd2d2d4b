// ==========================================
// 课表排课引擎 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义编排层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::default_working_days;
use crate::error::EngineResult;
use async_trait::async_trait;
use chrono::Weekday;

/// 月度运行的默认重复次数
pub const DEFAULT_MONTH_REPETITIONS: u32 = 4;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（config_kv 表）/ EngineConfig（内存）
#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    /// 获取工作日列表（周排课使用）
    ///
    /// # 默认值
    /// - monday..friday
    async fn get_working_days(&self) -> EngineResult<Vec<Weekday>>;

    /// 获取月度运行的重复次数
    ///
    /// # 默认值
    /// - 4
    async fn get_month_repetitions(&self) -> EngineResult<u32>;

    /// 获取统计缓存容量
    ///
    /// # 返回
    /// - None: 不限容量
    /// - Some(n): 最多保留 n 条
    async fn get_stats_cache_capacity(&self) -> EngineResult<Option<usize>>;
}

// ==========================================
// EngineConfig - 内存配置
// ==========================================
// 无数据库时使用（测试、嵌入调用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub working_days: Vec<Weekday>,
    pub month_repetitions: u32,
    pub stats_cache_capacity: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            working_days: default_working_days(),
            month_repetitions: DEFAULT_MONTH_REPETITIONS,
            stats_cache_capacity: None,
        }
    }
}

#[async_trait]
impl EngineConfigReader for EngineConfig {
    async fn get_working_days(&self) -> EngineResult<Vec<Weekday>> {
        Ok(self.working_days.clone())
    }

    async fn get_month_repetitions(&self) -> EngineResult<u32> {
        Ok(self.month_repetitions)
    }

    async fn get_stats_cache_capacity(&self) -> EngineResult<Option<usize>> {
        Ok(self.stats_cache_capacity)
    }
}
