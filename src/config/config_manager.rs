// ==========================================
// 课表排课引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入、快照与恢复
// 存储: config_kv 表 (key-value + scope)
// 红线: 缺失或格式错误的配置回退默认值，不阻断排课
// ==========================================

use crate::config::engine_config_trait::{EngineConfigReader, DEFAULT_MONTH_REPETITIONS};
use crate::db::{ensure_config_schema, open_sqlite_connection};
use crate::domain::types::{default_working_days, parse_weekday, weekday_name};
use crate::error::{EngineError, EngineResult};
use async_trait::async_trait;
use chrono::Weekday;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（不存在的表会被创建）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> EngineResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> EngineResult<Self> {
        {
            let conn_guard = lock_conn(&conn)?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_config_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> EngineResult<Option<String>> {
        let conn = lock_conn(&self.conn)?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global 配置（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> EngineResult<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 写入工作日列表（以逗号分隔的小写星期名存储）
    pub fn set_working_days(&self, days: &[Weekday]) -> EngineResult<()> {
        let value = days
            .iter()
            .map(|d| weekday_name(*d))
            .collect::<Vec<_>>()
            .join(",");
        self.set_config_value(config_keys::WORKING_DAYS, &value)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> EngineResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 随排课报告归档，保证结果可复现
    pub fn get_config_snapshot(&self) -> EngineResult<String> {
        let conn = lock_conn(&self.conn)?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名 global 配置；以 `__meta_` 开头的键不回写
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> EngineResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = lock_conn(&self.conn)?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            if key.starts_with("__meta_") {
                continue;
            }
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

fn lock_conn(conn: &Arc<Mutex<Connection>>) -> EngineResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| EngineError::Lock(format!("配置库连接锁获取失败: {}", e)))
}

// ==========================================
// EngineConfigReader Trait 实现
// ==========================================
#[async_trait]
impl EngineConfigReader for ConfigManager {
    async fn get_working_days(&self) -> EngineResult<Vec<Weekday>> {
        let Some(value) = self.get_global_config_value(config_keys::WORKING_DAYS)? else {
            return Ok(default_working_days());
        };

        let parsed: Option<Vec<Weekday>> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_weekday)
            .collect();

        match parsed {
            Some(days) if !days.is_empty() => Ok(days),
            _ => {
                warn!(
                    config_key = config_keys::WORKING_DAYS,
                    raw_value = %value,
                    "工作日配置格式错误，使用默认值"
                );
                Ok(default_working_days())
            }
        }
    }

    async fn get_month_repetitions(&self) -> EngineResult<u32> {
        let default = DEFAULT_MONTH_REPETITIONS.to_string();
        let value = self.get_config_or_default(config_keys::MONTH_REPETITIONS, &default)?;
        match value.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => {
                warn!(
                    config_key = config_keys::MONTH_REPETITIONS,
                    raw_value = %value,
                    "月度重复次数配置格式错误，使用默认值"
                );
                Ok(DEFAULT_MONTH_REPETITIONS)
            }
        }
    }

    async fn get_stats_cache_capacity(&self) -> EngineResult<Option<usize>> {
        let Some(value) = self.get_global_config_value(config_keys::STATS_CACHE_CAPACITY)? else {
            return Ok(None);
        };

        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unbounded") {
            return Ok(None);
        }
        match trimmed.parse::<usize>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                warn!(
                    config_key = config_keys::STATS_CACHE_CAPACITY,
                    raw_value = %value,
                    "统计缓存容量配置格式错误，使用不限容量"
                );
                Ok(None)
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 周期
    pub const WORKING_DAYS: &str = "working_days"; // 逗号分隔，如 monday,tuesday
    pub const MONTH_REPETITIONS: &str = "month_repetitions";

    // 统计
    pub const STATS_CACHE_CAPACITY: &str = "stats_cache_capacity"; // 数字或 unbounded
}
