// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use timetable_engine::{Class, ClassStatus, Group, Needs, Room, Slot};

// ==========================================
// Room 构建器
// ==========================================

pub struct RoomBuilder {
    id: String,
    building_id: String,
    capacity: u32,
    features: Vec<String>,
}

impl RoomBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            building_id: "B1".to_string(),
            capacity: 30,
            features: Vec::new(),
        }
    }

    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn features(mut self, features: &[&str]) -> Self {
        self.features = features.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(self) -> Room {
        Room {
            name: format!("Room {}", self.id),
            id: self.id,
            building_id: self.building_id,
            capacity: self.capacity,
            features: self.features,
        }
    }
}

// ==========================================
// Class 构建器
// ==========================================

pub struct ClassBuilder {
    id: String,
    course_id: String,
    needs: Needs,
    teacher_id: String,
    group_id: String,
    slot_id: Option<String>,
    room_id: Option<String>,
    status: ClassStatus,
}

impl ClassBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            course_id: "MATH".to_string(),
            needs: Needs::None,
            teacher_id: "T1".to_string(),
            group_id: "G1".to_string(),
            slot_id: None,
            room_id: None,
            status: ClassStatus::Planned,
        }
    }

    pub fn needs(mut self, needs: Needs) -> Self {
        self.needs = needs;
        self
    }

    pub fn teacher(mut self, teacher_id: &str) -> Self {
        self.teacher_id = teacher_id.to_string();
        self
    }

    pub fn group(mut self, group_id: &str) -> Self {
        self.group_id = group_id.to_string();
        self
    }

    /// 已排课程（status = scheduled）
    pub fn placed(mut self, slot_id: &str, room_id: &str) -> Self {
        self.slot_id = Some(slot_id.to_string());
        self.room_id = Some(room_id.to_string());
        self.status = ClassStatus::Scheduled;
        self
    }

    pub fn status(mut self, status: ClassStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Class {
        Class {
            id: self.id,
            course_id: self.course_id,
            needs: self.needs,
            teacher_id: self.teacher_id,
            group_id: self.group_id,
            slot_id: self.slot_id,
            room_id: self.room_id,
            status: self.status,
        }
    }
}

// ==========================================
// 简单实体
// ==========================================

pub fn create_test_slot(id: &str, day: &str, start: &str, end: &str) -> Slot {
    Slot {
        id: id.to_string(),
        day: day.to_string(),
        start: start.to_string(),
        end: end.to_string(),
    }
}

pub fn create_test_group(id: &str, size: u32) -> Group {
    Group {
        id: id.to_string(),
        name: format!("Group {}", id),
        size,
        track: "cs".to_string(),
    }
}

/// 一周的时间段：每天 3 节（MON1..FRI3）
pub fn create_week_slots() -> Vec<Slot> {
    let days = [
        ("MON", "monday"),
        ("TUE", "tuesday"),
        ("WED", "wednesday"),
        ("THU", "thursday"),
        ("FRI", "friday"),
    ];
    let times = [("8:00", "10:00"), ("10:00", "12:00"), ("12:00", "14:00")];

    days.iter()
        .flat_map(|(prefix, day)| {
            times.iter().enumerate().map(move |(i, (start, end))| {
                create_test_slot(&format!("{}{}", prefix, i + 1), day, start, end)
            })
        })
        .collect()
}
