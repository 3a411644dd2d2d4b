// ==========================================
// 课表统计与缓存集成测试
// ==========================================
// 测试目标: 验证冲突/窗口统计与统计缓存
// 覆盖范围: 空输入、冲突计数、窗口计数、排课前后对比、缓存命中与并发共享
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use std::sync::Arc;
use timetable_engine::engine::{CacheStats, DayAllocator, StatsCache, TimetableStats, TimetableStatsAnalyzer};

#[test]
fn test_empty_collection_has_no_issues() {
    let stats = TimetableStatsAnalyzer::compute(&[], &create_week_slots());
    assert_eq!(stats, TimetableStats { conflicts: 0, windows: 0 });
}

#[test]
fn test_group_window_and_teacher_conflict() {
    let slots = create_week_slots();
    let classes = vec![
        ClassBuilder::new("A").teacher("T1").group("G1").placed("MON1", "R01").build(),
        ClassBuilder::new("B").teacher("T1").group("G2").placed("MON1", "R02").build(),
        ClassBuilder::new("C").teacher("T3").group("G1").placed("MON3", "R01").build(),
    ];

    let stats = TimetableStatsAnalyzer::compute(&classes, &slots);
    assert_eq!(stats.conflicts, 1);
    assert_eq!(stats.windows, 1);
}

#[test]
fn test_seed_stats_before_and_after_monday() {
    let snapshot = test_helpers::load_seed_snapshot();
    let before = TimetableStatsAnalyzer::compute(&snapshot.classes, &snapshot.slots);
    assert_eq!(before, TimetableStats::default());

    let outcome = DayAllocator::new().schedule_day(
        "monday",
        &snapshot.classes,
        &snapshot.rooms,
        &snapshot.slots,
        &snapshot.groups,
    );
    let after = TimetableStatsAnalyzer::compute(&outcome.classes, &snapshot.slots);

    // 贪心分配不产生冲突
    assert_eq!(after.conflicts, 0);
    // 以 C4 为 head 的后缀 (C4, C5, C6) 中 G1 只剩 MON1/MON3 → 1 个空档
    assert_eq!(after.windows, 1);
}

#[test]
fn test_cache_returns_same_result_and_counts_hits() {
    let snapshot = test_helpers::load_seed_snapshot();
    let cache = StatsCache::new();

    let first = cache.get_or_compute(&snapshot.classes, &snapshot.slots).unwrap();
    let second = cache.get_or_compute(&snapshot.classes, &snapshot.slots).unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, size: 1 });
}

#[test]
fn test_shared_cache_across_threads() {
    let snapshot = Arc::new(test_helpers::load_seed_snapshot());
    let cache = Arc::new(StatsCache::with_capacity(Some(4)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let snapshot = Arc::clone(&snapshot);
            std::thread::spawn(move || cache.get_or_compute(&snapshot.classes, &snapshot.slots).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), TimetableStats::default());
    }

    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 4);
    assert_eq!(stats.size, 1);
}
