// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use chrono::Weekday;
use std::sync::atomic::{AtomicUsize, Ordering};
use timetable_engine::config::EngineConfigReader;
use timetable_engine::EngineResult;

/// Mock 配置结构（记录被读取的次数）
#[derive(Debug)]
pub struct MockConfig {
    pub working_days: Vec<Weekday>,
    pub month_repetitions: u32,
    pub stats_cache_capacity: Option<usize>,
    pub reads: AtomicUsize,
}

impl MockConfig {
    /// 创建默认配置（周一至周五，月度 4 次）
    pub fn default() -> Self {
        Self {
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            month_repetitions: 4,
            stats_cache_capacity: None,
            reads: AtomicUsize::new(0),
        }
    }

    /// 指定工作日
    pub fn with_days(days: Vec<Weekday>) -> Self {
        let mut config = Self::default();
        config.working_days = days;
        config
    }

    /// 指定月度重复次数
    pub fn with_repetitions(repetitions: u32) -> Self {
        let mut config = Self::default();
        config.month_repetitions = repetitions;
        config
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineConfigReader for MockConfig {
    async fn get_working_days(&self) -> EngineResult<Vec<Weekday>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.working_days.clone())
    }

    async fn get_month_repetitions(&self) -> EngineResult<u32> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.month_repetitions)
    }

    async fn get_stats_cache_capacity(&self) -> EngineResult<Option<usize>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.stats_cache_capacity)
    }
}
