// ==========================================
// 课表排课引擎 - 教学资源领域模型
// ==========================================
// 职责: 教学楼 / 教室 / 教师 / 班级 / 课程
// 红线: 不可变值对象，构造后不原地修改
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Building - 教学楼
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Building {
    pub id: String,   // 教学楼ID
    pub name: String, // 名称
}

// ==========================================
// Room - 教室
// ==========================================
// 用途: 分配引擎的候选资源，按容量与设施过滤
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub id: String,          // 教室ID
    pub building_id: String, // 所属教学楼ID
    pub name: String,        // 名称/门牌号
    pub capacity: u32,       // 座位数

    /// 设施标签（如 projector / lab / lecture-hall）
    #[serde(default)]
    pub features: Vec<String>,
}

impl Room {
    /// 是否容纳得下指定人数
    pub fn fits(&self, size: u32) -> bool {
        self.capacity >= size
    }
}

// ==========================================
// Teacher - 教师
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dept: String, // 所属教研室
}

// ==========================================
// Group - 教学班级
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub size: u32, // 班级人数
    #[serde(default)]
    pub track: String, // 培养方向
}

// ==========================================
// Course - 课程
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Course {
    pub code: String, // 课程代码（唯一）
    pub title: String,
    #[serde(default)]
    pub dept: String,
    #[serde(default)]
    pub hours_per_week: u32,
}
