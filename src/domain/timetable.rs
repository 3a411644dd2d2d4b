// ==========================================
// 课表排课引擎 - 课表领域模型
// ==========================================
// 职责: 时间段 / 课程安排 / 设施需求 / 排课约束
// 红线: 引擎只产出新实例，不修改输入
// ==========================================

use crate::domain::types::ClassStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ==========================================
// Slot - 时间段
// ==========================================
// (day, start, end) 决定同一天内的先后顺序
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,    // 时间段ID（如 MON1）
    pub day: String,   // 星期（如 monday）
    pub start: String, // 开始时间
    pub end: String,   // 结束时间
}

impl Slot {
    /// 是否属于指定星期（大小写不敏感）
    pub fn is_on(&self, day: &str) -> bool {
        self.day.trim().eq_ignore_ascii_case(day.trim())
    }

    /// 时间段序号：取 ID 末位数字（如 MON3 → 3）
    ///
    /// 末位不是数字的时间段没有序号
    pub fn ordinal(&self) -> Option<u32> {
        self.id.chars().last().and_then(|c| c.to_digit(10))
    }
}

// ==========================================
// Needs - 设施需求
// ==========================================
// JSON 中可以是单个字符串、字符串列表或 null
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Needs {
    Many(Vec<String>),
    One(String),
    #[default]
    None,
}

impl Needs {
    /// 归一化后的需求标签（小写、去空白、去空串）
    pub fn tokens(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Needs::Many(items) => items.iter().map(String::as_str).collect(),
            Needs::One(item) => vec![item.as_str()],
            Needs::None => Vec::new(),
        };
        raw.into_iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }
}

impl From<&str> for Needs {
    fn from(value: &str) -> Self {
        Needs::One(value.to_string())
    }
}

impl From<Vec<&str>> for Needs {
    fn from(value: Vec<&str>) -> Self {
        Needs::Many(value.into_iter().map(str::to_string).collect())
    }
}

// ==========================================
// Class - 课程安排（一节课）
// ==========================================
// slot_id 为空 = 未排课
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub course_id: String,
    #[serde(default)]
    pub needs: Needs,
    pub teacher_id: String,
    pub group_id: String,

    #[serde(default, with = "optional_id")]
    pub slot_id: Option<String>,
    #[serde(default, with = "optional_id")]
    pub room_id: Option<String>,

    #[serde(default)]
    pub status: ClassStatus,
}

impl Class {
    /// 是否已有时间段
    pub fn is_scheduled(&self) -> bool {
        self.slot_id.is_some()
    }

    /// 是否同时具备时间段与教室
    pub fn is_placed(&self) -> bool {
        self.slot_id.is_some() && self.room_id.is_some()
    }

    pub fn slot(&self) -> Option<&str> {
        self.slot_id.as_deref()
    }

    pub fn room(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    /// 生成落位后的新实例（status = scheduled）
    pub fn assigned_to(&self, slot_id: &str, room_id: &str) -> Class {
        Class {
            slot_id: Some(slot_id.to_string()),
            room_id: Some(room_id.to_string()),
            status: ClassStatus::Scheduled,
            ..self.clone()
        }
    }
}

// ==========================================
// Constraint - 排课约束
// ==========================================
// 当前版本引擎不消费，仅随快照透传
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: String,
    pub kind: String, // 约束类型（如 max_windows_per_day）
    #[serde(default)]
    pub payload: Map<String, Value>,
}

// ==========================================
// 可选ID序列化: "" / null / 缺失 ⇔ None（仅空白的ID视为已填写）
// ==========================================
pub(crate) mod optional_id {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}
