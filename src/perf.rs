// ==========================================
// 课表排课引擎 - 性能统计
// ==========================================
// 职责: 记录引擎操作耗时（target = "perf"），超过阈值记慢操作告警
// 开关:
// - Debug 默认开启；Release 默认关闭
// - `TIMETABLE_ENGINE_PERF=1` 强制开启
// - `TIMETABLE_ENGINE_SLOW_OP_MS=200` 配置慢操作阈值（毫秒）
// ==========================================

use std::sync::OnceLock;
use std::time::Instant;

struct PerfSettings {
    enabled: bool,
    slow_op_ms: u64,
}

static SETTINGS: OnceLock<PerfSettings> = OnceLock::new();

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn settings() -> &'static PerfSettings {
    SETTINGS.get_or_init(|| {
        let enabled = match std::env::var("TIMETABLE_ENGINE_PERF") {
            Ok(v) => is_true(&v),
            Err(_) => cfg!(debug_assertions),
        };
        let slow_op_ms = std::env::var("TIMETABLE_ENGINE_SLOW_OP_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
        PerfSettings { enabled, slow_op_ms }
    })
}

/// 性能统计 Guard：离开作用域时记录 elapsed_ms
///
/// 使用方式：
/// ```ignore
/// let _perf = timetable_engine::perf::PerfGuard::new("generate_period_report");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    items: Option<usize>,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            items: None,
        }
    }

    /// 附带处理条目数（如课程数）
    pub fn with_items(mut self, items: usize) -> Self {
        self.items = Some(items);
        self
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let settings = settings();
        let elapsed_ms = self.elapsed_ms();

        if settings.slow_op_ms > 0 && elapsed_ms >= settings.slow_op_ms {
            tracing::warn!(
                target: "slow_op",
                op = self.op,
                elapsed_ms,
                threshold_ms = settings.slow_op_ms,
                "slow op"
            );
        }

        if !settings.enabled {
            return;
        }

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            items = self.items.unwrap_or(0),
            "done"
        );
    }
}
