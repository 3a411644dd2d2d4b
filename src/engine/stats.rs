// ==========================================
// 课表排课引擎 - 课表统计分析
// ==========================================
// 职责: 计算课表冲突数与空档（窗口）数，并提供结果缓存
// 输入: 课程快照 + 时间段
// 输出: TimetableStats { conflicts, windows }
// 红线: 计算为纯函数；缓存为显式对象，不使用全局状态
// ==========================================
// 遍历规则: 依次以每节课为 head，tail 为其后的全部课程
// - 冲突: tail 中与 head 同一非空时间段，且同班级或同教师
// - 窗口: 在当前后缀 (head + tail) 内统计 head 班级当天的空档
// ==========================================

use crate::domain::timetable::{Class, Slot};
use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::debug;

// ==========================================
// TimetableStats - 统计结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimetableStats {
    pub conflicts: usize,
    pub windows: usize,
}

// ==========================================
// TimetableStatsAnalyzer - 统计计算（纯函数）
// ==========================================
pub struct TimetableStatsAnalyzer;

impl TimetableStatsAnalyzer {
    /// 计算冲突数与窗口数
    ///
    /// # 参数
    /// - `classes`: 课程快照（顺序影响窗口统计的后缀范围）
    /// - `slots`: 时间段
    ///
    /// # 返回
    /// 空课程集合返回 (0, 0)
    pub fn compute(classes: &[Class], slots: &[Slot]) -> TimetableStats {
        let mut stats = TimetableStats::default();

        for (index, head) in classes.iter().enumerate() {
            let suffix = &classes[index..];
            let tail = &suffix[1..];

            stats.conflicts += Self::head_conflicts(head, tail);
            stats.windows += Self::head_windows(head, suffix, slots);
        }

        stats
    }

    /// head 与 tail 的冲突数
    fn head_conflicts(head: &Class, tail: &[Class]) -> usize {
        let Some(head_slot) = head.slot() else {
            return 0;
        };

        tail.iter()
            .filter(|other| other.slot() == Some(head_slot))
            .filter(|other| other.group_id == head.group_id || other.teacher_id == head.teacher_id)
            .count()
    }

    /// head 班级在 head 所在日的空档数（仅统计当前后缀）
    fn head_windows(head: &Class, suffix: &[Class], slots: &[Slot]) -> usize {
        let Some(head_slot) = head.slot() else {
            return 0;
        };
        let Some(day) = slots.iter().find(|s| s.id == head_slot).map(|s| s.day.as_str()) else {
            return 0;
        };

        let mut ordinals: Vec<u32> = slots
            .iter()
            .filter(|s| s.day == day)
            .filter(|s| {
                suffix
                    .iter()
                    .any(|c| c.group_id == head.group_id && c.slot() == Some(s.id.as_str()))
            })
            .filter_map(Slot::ordinal)
            .collect();
        ordinals.sort_unstable();

        ordinals
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .filter(|gap| *gap > 1)
            .map(|gap| (gap - 1) as usize)
            .sum()
    }
}

// ==========================================
// CacheStats - 缓存命中统计
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
}

type StatsKey = (Vec<Class>, Vec<Slot>);

#[derive(Default)]
struct CacheInner {
    entries: HashMap<StatsKey, TimetableStats>,
    order: VecDeque<StatsKey>,
}

// ==========================================
// StatsCache - 统计结果缓存
// ==========================================
// 键为完整的 (课程, 时间段) 快照值；内容相同但顺序不同视为不同键
pub struct StatsCache {
    inner: Mutex<CacheInner>,
    capacity: Option<usize>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl StatsCache {
    /// 无容量上限的缓存
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// 指定容量上限（超出时淘汰最早插入的条目）
    ///
    /// `Some(0)` 等价于禁用缓存
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// 读取缓存，未命中时计算并写入
    ///
    /// 计算在锁外进行；并发的相同请求可能重复计算，结果一致
    pub fn get_or_compute(&self, classes: &[Class], slots: &[Slot]) -> EngineResult<TimetableStats> {
        let key: StatsKey = (classes.to_vec(), slots.to_vec());

        if let Some(stats) = self.lock()?.entries.get(&key).copied() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(conflicts = stats.conflicts, windows = stats.windows, "统计缓存命中");
            return Ok(stats);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let stats = TimetableStatsAnalyzer::compute(classes, slots);
        self.insert(key, stats)?;
        debug!(conflicts = stats.conflicts, windows = stats.windows, "统计缓存未命中，已计算");
        Ok(stats)
    }

    /// 当前命中统计
    pub fn stats(&self) -> CacheStats {
        let size = self.inner.lock().map_or(0, |inner| inner.entries.len());
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size,
        }
    }

    /// 清空条目与计数
    pub fn clear(&self) -> EngineResult<()> {
        let mut inner = self.lock()?;
        inner.entries.clear();
        inner.order.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        Ok(())
    }

    fn insert(&self, key: StatsKey, stats: TimetableStats) -> EngineResult<()> {
        if self.capacity == Some(0) {
            return Ok(());
        }

        let mut inner = self.lock()?;
        if inner.entries.insert(key.clone(), stats).is_none() {
            inner.order.push_back(key);
        }

        if let Some(capacity) = self.capacity {
            while inner.entries.len() > capacity {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.entries.remove(&oldest);
            }
        }
        Ok(())
    }

    fn lock(&self) -> EngineResult<std::sync::MutexGuard<'_, CacheInner>> {
        self.inner
            .lock()
            .map_err(|e| EngineError::Lock(format!("统计缓存锁获取失败: {}", e)))
    }
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new()
    }
}
