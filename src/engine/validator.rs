// ==========================================
// 课表排课引擎 - 单次排课校验器
// ==========================================
// 职责: 校验一个拟定的课程落位（时间段+教室）是否满足全部约束
// 输入: 全量课程 + 教室 + 时间段 + 班级 + 候选课程
// 输出: Ok(候选课程原样) 或 Err(按类别累积的错误表)
// 红线: 纯函数，无副作用，可并发重复调用
// ==========================================

use crate::domain::resource::{Group, Room};
use crate::domain::snapshot::Snapshot;
use crate::domain::timetable::{Class, Slot};
use crate::domain::types::ErrorCategory;
use crate::engine::feature_match::FeatureMatcher;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// ValidationErrors - 按类别累积的错误表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<ErrorCategory, String>,
}

impl ValidationErrors {
    fn new() -> Self {
        Self::default()
    }

    /// 同一类别只记录第一次出现
    fn record(&mut self, category: ErrorCategory, message: String) {
        self.errors.entry(category).or_insert(message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn contains(&self, category: ErrorCategory) -> bool {
        self.errors.contains_key(&category)
    }

    pub fn get(&self, category: ErrorCategory) -> Option<&str> {
        self.errors.get(&category).map(String::as_str)
    }

    pub fn categories(&self) -> impl Iterator<Item = ErrorCategory> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorCategory, &str)> + '_ {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(category, message)| format!("{}: {}", category, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// ==========================================
// AssignmentValidator - 校验器
// ==========================================
pub struct AssignmentValidator;

impl AssignmentValidator {
    /// 校验单个课程落位
    ///
    /// 检查顺序：
    /// 1. slot: 时间段为空或不存在 → 立即失败（后续检查依赖已解析的时间段）
    /// 2. room: 教室不存在
    /// 3. group: 班级不存在
    /// 4. capacity: 教室座位数 < 班级人数
    /// 5. features: 教室设施不满足课程需求（空需求恒通过）
    /// 6. 冲突扫描: 同一时间段的其他课程（排除自身ID），教室/教师/班级相同即冲突，
    ///    每类只记录第一次
    ///
    /// # 返回
    /// - Ok(Class): 候选课程原样返回
    /// - Err(ValidationErrors): 累积的错误表
    pub fn validate(
        all_classes: &[Class],
        rooms: &[Room],
        slots: &[Slot],
        groups: &[Group],
        candidate: &Class,
    ) -> Result<Class, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        // 1. 时间段（快速失败）
        let slot = match candidate.slot() {
            Some(slot_id) => slots.iter().find(|s| s.id == slot_id),
            None => None,
        };
        let slot = match slot {
            Some(slot) => slot,
            None => {
                errors.record(
                    ErrorCategory::Slot,
                    format!("时间段 {} 不存在", candidate.slot().unwrap_or("<空>")),
                );
                return Err(errors);
            }
        };

        // 2. 教室
        let room = candidate
            .room()
            .and_then(|room_id| rooms.iter().find(|r| r.id == room_id));
        if room.is_none() {
            errors.record(
                ErrorCategory::Room,
                format!("教室 {} 不存在", candidate.room().unwrap_or("<空>")),
            );
        }

        // 3. 班级
        let group = groups.iter().find(|g| g.id == candidate.group_id);
        if group.is_none() {
            errors.record(
                ErrorCategory::Group,
                format!("班级 {} 不存在", candidate.group_id),
            );
        }

        // 4. 容量
        if let (Some(room), Some(group)) = (room, group) {
            if !room.fits(group.size) {
                errors.record(
                    ErrorCategory::Capacity,
                    format!(
                        "教室 {} ({} 座) 容纳不下班级 {} ({} 人)",
                        room.name, room.capacity, group.id, group.size
                    ),
                );
            }
        }

        // 5. 设施
        if let Some(room) = room {
            let missing = FeatureMatcher::missing_needs(&candidate.needs, &room.features);
            if !missing.is_empty() {
                errors.record(
                    ErrorCategory::Features,
                    format!("教室 {} 不具备所需设施: {}", room.name, missing.join(", ")),
                );
            }
        }

        // 6. 冲突扫描
        for other in all_classes {
            if other.id == candidate.id || other.slot() != Some(slot.id.as_str()) {
                continue;
            }

            if candidate.room().is_some() && other.room() == candidate.room() {
                errors.record(
                    ErrorCategory::CollisionRoom,
                    format!(
                        "教室 {} 在时间段 {} 已被课程 {} 占用",
                        candidate.room().unwrap_or_default(),
                        slot.id,
                        other.id
                    ),
                );
            }
            if !candidate.teacher_id.is_empty() && other.teacher_id == candidate.teacher_id {
                errors.record(
                    ErrorCategory::CollisionTeacher,
                    format!(
                        "教师 {} 在时间段 {} 已有课程 {}",
                        candidate.teacher_id, slot.id, other.id
                    ),
                );
            }
            if !candidate.group_id.is_empty() && other.group_id == candidate.group_id {
                errors.record(
                    ErrorCategory::CollisionGroup,
                    format!(
                        "班级 {} 在时间段 {} 已有课程 {}",
                        candidate.group_id, slot.id, other.id
                    ),
                );
            }
        }

        if errors.is_empty() {
            Ok(candidate.clone())
        } else {
            Err(errors)
        }
    }

    /// 基于快照校验（便捷入口）
    pub fn validate_in(snapshot: &Snapshot, candidate: &Class) -> Result<Class, ValidationErrors> {
        Self::validate(
            &snapshot.classes,
            &snapshot.rooms,
            &snapshot.slots,
            &snapshot.groups,
            candidate,
        )
    }
}
