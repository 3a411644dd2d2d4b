// ==========================================
// 课表排课引擎 - 领域类型定义
// ==========================================
// 职责: 课程状态、校验错误类别、星期解析等基础类型
// ==========================================

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 课程状态 (Class Status)
// ==========================================
// 序列化格式: lowercase (与快照 JSON 一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    #[default]
    Planned,   // 计划中（未排）
    Scheduled, // 已排课
    Moved,     // 已调课
    Cancelled, // 已取消
    /// 外部数据中的空值/未知值，不阻断快照加载
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassStatus::Planned => write!(f, "planned"),
            ClassStatus::Scheduled => write!(f, "scheduled"),
            ClassStatus::Moved => write!(f, "moved"),
            ClassStatus::Cancelled => write!(f, "cancelled"),
            ClassStatus::Unknown => write!(f, "unknown"),
        }
    }
}

// ==========================================
// 校验错误类别 (Validation Error Category)
// ==========================================
// 顺序即校验顺序，BTreeMap 按此顺序输出
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Slot,             // 时间段缺失
    Room,             // 教室缺失
    Group,            // 班级缺失
    Capacity,         // 容量不足
    Features,         // 教室设施不满足
    CollisionRoom,    // 教室冲突
    CollisionTeacher, // 教师冲突
    CollisionGroup,   // 班级冲突
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Slot => "slot",
            ErrorCategory::Room => "room",
            ErrorCategory::Group => "group",
            ErrorCategory::Capacity => "capacity",
            ErrorCategory::Features => "features",
            ErrorCategory::CollisionRoom => "collision_room",
            ErrorCategory::CollisionTeacher => "collision_teacher",
            ErrorCategory::CollisionGroup => "collision_group",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 星期 (Weekday) 工具
// ==========================================

/// 星期的小写全称（与 Slot.day 的数据口径一致）
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// 解析星期名称
///
/// 支持全称与三字母缩写，大小写不敏感（如 "Monday" / "mon"）
///
/// # 返回
/// - Some(Weekday): 解析成功
/// - None: 无法识别
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    raw.trim().parse::<Weekday>().ok()
}

/// 默认工作日（周一至周五）
pub fn default_working_days() -> Vec<Weekday> {
    vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekday_variants() {
        assert_eq!(parse_weekday("monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday(" Friday "), Some(Weekday::Fri));
        assert_eq!(parse_weekday("wed"), Some(Weekday::Wed));
        assert_eq!(parse_weekday("funday"), None);
        assert_eq!(parse_weekday(""), None);
    }

    #[test]
    fn test_class_status_serde() {
        let status: ClassStatus = serde_json::from_str("\"scheduled\"").unwrap();
        assert_eq!(status, ClassStatus::Scheduled);

        // 空字符串/未知值不应导致加载失败
        let status: ClassStatus = serde_json::from_str("\"\"").unwrap();
        assert_eq!(status, ClassStatus::Unknown);

        assert_eq!(serde_json::to_string(&ClassStatus::Cancelled).unwrap(), "\"cancelled\"");
    }

    #[test]
    fn test_error_category_order() {
        assert!(ErrorCategory::Slot < ErrorCategory::Room);
        assert!(ErrorCategory::Features < ErrorCategory::CollisionRoom);
        assert_eq!(ErrorCategory::CollisionTeacher.to_string(), "collision_teacher");
    }
}
