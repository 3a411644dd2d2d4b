// ==========================================
// 课表排课引擎 - 数据快照
// ==========================================
// 职责: 聚合全部领域集合，提供 JSON 反序列化与完整性检查
// 红线: 完整性问题只报告，不阻断引擎
// ==========================================

use crate::domain::resource::{Building, Course, Group, Room, Teacher};
use crate::domain::timetable::{Class, Constraint, Slot};
use crate::error::EngineResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;

// ==========================================
// Snapshot - 某一时刻的全量只读数据
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Snapshot {
    /// 从 JSON 字符串加载快照
    pub fn from_json_str(raw: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// 从任意 Reader 加载快照
    pub fn from_json_reader<R: Read>(reader: R) -> EngineResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// 以新课程集合生成新快照（其他集合保持不变）
    pub fn with_classes(&self, classes: Vec<Class>) -> Snapshot {
        Snapshot {
            classes,
            ..self.clone()
        }
    }

    /// 完整性检查
    ///
    /// 检查项：
    /// 1. 各集合ID重复（课程按 code）
    /// 2. 教室引用不存在的教学楼
    /// 3. 课程安排引用不存在的课程/教师/班级/时间段/教室
    pub fn integrity_report(&self) -> IntegrityReport {
        let mut issues = Vec::new();

        collect_duplicates("building", self.buildings.iter().map(|b| b.id.as_str()), &mut issues);
        collect_duplicates("room", self.rooms.iter().map(|r| r.id.as_str()), &mut issues);
        collect_duplicates("teacher", self.teachers.iter().map(|t| t.id.as_str()), &mut issues);
        collect_duplicates("group", self.groups.iter().map(|g| g.id.as_str()), &mut issues);
        collect_duplicates("course", self.courses.iter().map(|c| c.code.as_str()), &mut issues);
        collect_duplicates("slot", self.slots.iter().map(|s| s.id.as_str()), &mut issues);
        collect_duplicates("class", self.classes.iter().map(|c| c.id.as_str()), &mut issues);

        let building_ids: HashSet<&str> = self.buildings.iter().map(|b| b.id.as_str()).collect();
        for room in &self.rooms {
            if !building_ids.contains(room.building_id.as_str()) {
                issues.push(IntegrityIssue::DanglingReference {
                    owner: format!("room:{}", room.id),
                    target: "building",
                    id: room.building_id.clone(),
                });
            }
        }

        let course_ids: HashSet<&str> = self.courses.iter().map(|c| c.code.as_str()).collect();
        let teacher_ids: HashSet<&str> = self.teachers.iter().map(|t| t.id.as_str()).collect();
        let group_ids: HashSet<&str> = self.groups.iter().map(|g| g.id.as_str()).collect();
        let slot_ids: HashSet<&str> = self.slots.iter().map(|s| s.id.as_str()).collect();
        let room_ids: HashSet<&str> = self.rooms.iter().map(|r| r.id.as_str()).collect();

        for class in &self.classes {
            let owner = format!("class:{}", class.id);
            let mut refs: Vec<(&'static str, &str, &HashSet<&str>)> = vec![
                ("course", class.course_id.as_str(), &course_ids),
                ("teacher", class.teacher_id.as_str(), &teacher_ids),
                ("group", class.group_id.as_str(), &group_ids),
            ];
            if let Some(slot_id) = class.slot() {
                refs.push(("slot", slot_id, &slot_ids));
            }
            if let Some(room_id) = class.room() {
                refs.push(("room", room_id, &room_ids));
            }

            for (target, id, known) in refs {
                if !known.contains(id) {
                    issues.push(IntegrityIssue::DanglingReference {
                        owner: owner.clone(),
                        target,
                        id: id.to_string(),
                    });
                }
            }
        }

        IntegrityReport { issues }
    }
}

fn collect_duplicates<'a, I>(entity: &'static str, ids: I, issues: &mut Vec<IntegrityIssue>)
where
    I: Iterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for id in ids {
        if !seen.insert(id) && reported.insert(id) {
            issues.push(IntegrityIssue::DuplicateId {
                entity,
                id: id.to_string(),
            });
        }
    }
}

// ==========================================
// IntegrityIssue - 完整性问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// 同一集合中ID重复
    DuplicateId { entity: &'static str, id: String },
    /// 引用了不存在的实体
    DanglingReference {
        owner: String,
        target: &'static str,
        id: String,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::DuplicateId { entity, id } => {
                write!(f, "{} ID 重复: {}", entity, id)
            }
            IntegrityIssue::DanglingReference { owner, target, id } => {
                write!(f, "{} 引用了不存在的 {}: {}", owner, target, id)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
