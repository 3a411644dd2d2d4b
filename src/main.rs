// ==========================================
// 课表排课引擎 - 命令行入口
// ==========================================
// 用法: timetable-engine <snapshot.json> [period] [config_db]
// - period: week（默认）/ month / 逗号分隔的星期
// - config_db: 配置库路径（缺省取 TIMETABLE_ENGINE_DB_PATH 或用户数据目录）
// 输出: 报告 + 统计，JSON 打印到 stdout
// ==========================================

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use timetable_engine::config::{ConfigManager, EngineConfigReader};
use timetable_engine::engine::{Period, PeriodOrchestrator, StatsCache};
use timetable_engine::{logging, Snapshot};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(snapshot_path) = args.first() else {
        bail!("用法: timetable-engine <snapshot.json> [period] [config_db]");
    };
    let period = match args.get(1) {
        Some(raw) => Period::parse(raw).with_context(|| format!("无效的排课周期: {}", raw))?,
        None => Period::Week,
    };
    let db_path = args.get(2).cloned().unwrap_or_else(get_default_db_path);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", timetable_engine::APP_NAME, timetable_engine::VERSION);
    tracing::info!(snapshot = %snapshot_path, period = %period, db_path = %db_path, "启动参数");
    tracing::info!("==================================================");

    let file = File::open(snapshot_path).with_context(|| format!("无法打开快照文件: {}", snapshot_path))?;
    let snapshot = Snapshot::from_json_reader(BufReader::new(file))
        .with_context(|| format!("快照解析失败: {}", snapshot_path))?;
    let snapshot = Arc::new(snapshot);

    let config = Arc::new(ConfigManager::new(&db_path).with_context(|| format!("无法打开配置库: {}", db_path))?);
    let cache = StatsCache::with_capacity(config.get_stats_cache_capacity().await?);

    let orchestrator = PeriodOrchestrator::new(Arc::clone(&config));
    let run = orchestrator.run_period(&period, Arc::clone(&snapshot)).await?;

    let before = cache.get_or_compute(&snapshot.classes, &snapshot.slots)?;
    let merged = run.merged_classes(&snapshot.classes);
    let after = cache.get_or_compute(&merged, &snapshot.slots)?;

    let output = json!({
        "period": period.to_string(),
        "report": run,
        "stats": {
            "before": before,
            "after": after,
        },
        "config": serde_json::from_str::<serde_json::Value>(&config.get_config_snapshot()?)?,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// 默认配置库路径
///
/// 优先级: 环境变量 TIMETABLE_ENGINE_DB_PATH > 用户数据目录 > 当前目录
fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("TIMETABLE_ENGINE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./timetable_engine.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("timetable-engine");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("timetable_engine.db");
        }
    }

    path.to_string_lossy().to_string()
}
