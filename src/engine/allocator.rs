// ==========================================
// 课表排课引擎 - 单日贪心分配引擎
// ==========================================
// 职责: 为某一天的未排课程寻找 (时间段, 教室) 组合
// 输入: 星期 + 课程快照 + 教室 + 时间段 + 班级
// 输出: 新的课程快照 + 单日报告
// 红线: 已排课程原样透传；不修改输入；不回溯
// ==========================================
// 搜索顺序: 时间段优先、教室其次（均按输入顺序）
// 该顺序即并列时的决胜规则，输出必须可复现
// ==========================================

use crate::domain::report::{Collision, DayOutcome, DayReport};
use crate::domain::resource::{Group, Room};
use crate::domain::timetable::{Class, Slot};
use crate::engine::feature_match::FeatureMatcher;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

// ==========================================
// DayAllocator - 单日贪心分配引擎
// ==========================================
pub struct DayAllocator {
    // 无状态引擎，不需要注入依赖
}

/// 单节课的分配结果
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    /// 找到可用组合
    Placed { slot_id: String, room_id: String },
    /// 首个可用组合的教师已被占用（不再尝试后续时间段）
    TeacherBusy { slot_id: String },
    /// 当天没有满足条件的组合
    NoCandidate,
}

impl DayAllocator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单日排课
    ///
    /// 规则：
    /// 1) 只使用该星期的时间段（大小写不敏感）
    /// 2) 已落在当天的课程占用的 (时间段, 教室) 与 (教师, 时间段) 不可再用
    /// 3) 按输入顺序处理课程；已有时间段的课程原样透传
    /// 4) 未排课程取第一个满足 未占用/设施/容量 的组合；
    ///    若该组合的教师已被占用，则本次不排（不重试后续时间段）
    /// 5) 输出后再扫描一次重复占用，作为兜底冲突检查
    ///
    /// # 参数
    /// - `day`: 星期名称（如 monday）
    /// - `classes`: 课程快照
    /// - `rooms`: 教室（顺序即优先级）
    /// - `slots`: 全部时间段（顺序即优先级）
    /// - `groups`: 班级（用于容量检查）
    ///
    /// # 返回
    /// 新的课程快照 + 单日报告；本方法不会失败
    #[instrument(skip(self, day, classes, rooms, slots, groups), fields(
        day = %day,
        classes_count = classes.len(),
        rooms_count = rooms.len()
    ))]
    pub fn schedule_day(
        &self,
        day: &str,
        classes: &[Class],
        rooms: &[Room],
        slots: &[Slot],
        groups: &[Group],
    ) -> DayOutcome {
        // 1. 当天时间段
        let day_slots: Vec<&Slot> = slots.iter().filter(|s| s.is_on(day)).collect();
        let day_slot_ids: HashSet<&str> = day_slots.iter().map(|s| s.id.as_str()).collect();

        // 2. 已占用组合
        let mut taken_combos: HashSet<(String, String)> = HashSet::new();
        let mut taken_teacher_slot: HashSet<(String, String)> = HashSet::new();
        for class in classes {
            let Some(slot_id) = class.slot() else { continue };
            if !day_slot_ids.contains(slot_id) {
                continue;
            }
            if let Some(room_id) = class.room() {
                taken_combos.insert((slot_id.to_string(), room_id.to_string()));
            }
            taken_teacher_slot.insert((class.teacher_id.clone(), slot_id.to_string()));
        }

        debug!(
            day_slots = day_slots.len(),
            taken_combos = taken_combos.len(),
            "当天时间段与已占用组合准备完成"
        );

        // 3. 逐课分配
        let mut updated = Vec::with_capacity(classes.len());
        let mut assigned_ids = Vec::new();
        let mut unassigned_ids = Vec::new();

        for class in classes {
            if class.is_scheduled() {
                updated.push(class.clone());
                continue;
            }

            let group = groups.iter().find(|g| g.id == class.group_id);
            match self.find_placement(class, group, &day_slots, rooms, &taken_combos, &taken_teacher_slot) {
                Placement::Placed { slot_id, room_id } => {
                    debug!(class_id = %class.id, slot_id = %slot_id, room_id = %room_id, "课程落位");
                    updated.push(class.assigned_to(&slot_id, &room_id));
                    assigned_ids.push(class.id.clone());
                    taken_teacher_slot.insert((class.teacher_id.clone(), slot_id.clone()));
                    taken_combos.insert((slot_id, room_id));
                }
                Placement::TeacherBusy { slot_id } => {
                    debug!(
                        class_id = %class.id,
                        teacher_id = %class.teacher_id,
                        slot_id = %slot_id,
                        "TEACHER_BUSY: 首个可用组合的教师已被占用"
                    );
                    updated.push(class.clone());
                    unassigned_ids.push(class.id.clone());
                }
                Placement::NoCandidate => {
                    debug!(class_id = %class.id, "NO_CANDIDATE: 当天无可用组合");
                    updated.push(class.clone());
                    unassigned_ids.push(class.id.clone());
                }
            }
        }

        // 4. 兜底冲突扫描
        let collisions = Self::detect_collisions(&updated);

        // 5. 报告
        let report = DayReport {
            day: day.to_string(),
            scheduled_count: updated.iter().filter(|c| c.is_scheduled()).count(),
            assigned_this_run: assigned_ids.len(),
            unscheduled_count: updated.iter().filter(|c| !c.is_scheduled()).count(),
            collisions,
            assigned_ids,
            unassigned_ids,
        };

        info!(
            scheduled = report.scheduled_count,
            assigned = report.assigned_this_run,
            unscheduled = report.unscheduled_count,
            collisions = report.collisions.len(),
            "单日排课完成"
        );

        DayOutcome {
            day: day.to_string(),
            classes: updated,
            report,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 按 时间段优先/教室其次 寻找第一个可用组合
    fn find_placement(
        &self,
        class: &Class,
        group: Option<&Group>,
        day_slots: &[&Slot],
        rooms: &[Room],
        taken_combos: &HashSet<(String, String)>,
        taken_teacher_slot: &HashSet<(String, String)>,
    ) -> Placement {
        for slot in day_slots {
            for room in rooms {
                if taken_combos.contains(&(slot.id.clone(), room.id.clone())) {
                    continue;
                }
                if !FeatureMatcher::room_satisfies(room, &class.needs) {
                    continue;
                }
                // 班级未找到时跳过容量检查
                if let Some(group) = group {
                    if !room.fits(group.size) {
                        continue;
                    }
                }

                if taken_teacher_slot.contains(&(class.teacher_id.clone(), slot.id.clone())) {
                    return Placement::TeacherBusy {
                        slot_id: slot.id.clone(),
                    };
                }
                return Placement::Placed {
                    slot_id: slot.id.clone(),
                    room_id: room.id.clone(),
                };
            }
        }
        Placement::NoCandidate
    }

    /// 扫描输出中的重复占用
    ///
    /// 仅检查同时具备 时间段 与 教室/教师 的课程；
    /// 首次出现的课程作为基准，之后每个重复都记一条冲突
    pub fn detect_collisions(classes: &[Class]) -> Vec<Collision> {
        let mut collisions = Vec::new();

        let mut seen_rooms: HashMap<(&str, &str), &str> = HashMap::new();
        for class in classes {
            let (Some(slot_id), Some(room_id)) = (class.slot(), class.room()) else {
                continue;
            };
            match seen_rooms.get(&(slot_id, room_id)) {
                Some(first) => collisions.push(Collision::RoomConflict {
                    slot_id: slot_id.to_string(),
                    room_id: room_id.to_string(),
                    classes: [first.to_string(), class.id.clone()],
                }),
                None => {
                    seen_rooms.insert((slot_id, room_id), class.id.as_str());
                }
            }
        }

        let mut seen_teachers: HashMap<(&str, &str), &str> = HashMap::new();
        for class in classes {
            let Some(slot_id) = class.slot() else { continue };
            if class.teacher_id.is_empty() {
                continue;
            }
            let key = (class.teacher_id.as_str(), slot_id);
            match seen_teachers.get(&key) {
                Some(first) => collisions.push(Collision::TeacherConflict {
                    slot_id: slot_id.to_string(),
                    teacher_id: class.teacher_id.clone(),
                    classes: [first.to_string(), class.id.clone()],
                }),
                None => {
                    seen_teachers.insert(key, class.id.as_str());
                }
            }
        }

        collisions
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for DayAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timetable::Needs;
    use crate::domain::types::ClassStatus;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn room(id: &str, capacity: u32, features: &[&str]) -> Room {
        Room {
            id: id.to_string(),
            building_id: "B1".to_string(),
            name: id.to_string(),
            capacity,
            features: features.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn slot(id: &str, day: &str) -> Slot {
        Slot {
            id: id.to_string(),
            day: day.to_string(),
            start: "8:00".to_string(),
            end: "10:00".to_string(),
        }
    }

    fn group(id: &str, size: u32) -> Group {
        Group {
            id: id.to_string(),
            name: id.to_string(),
            size,
            track: "t".to_string(),
        }
    }

    fn class(id: &str, teacher: &str, group: &str, needs: &str) -> Class {
        Class {
            id: id.to_string(),
            course_id: "X".to_string(),
            needs: Needs::from(needs),
            teacher_id: teacher.to_string(),
            group_id: group.to_string(),
            slot_id: None,
            room_id: None,
            status: ClassStatus::Planned,
        }
    }

    // ==========================================
    // 基础功能测试
    // ==========================================

    #[test]
    fn test_single_class_assigned() {
        let allocator = DayAllocator::new();
        let rooms = vec![room("R01", 40, &["projector", "lecture-hall"])];
        let slots = vec![slot("MON1", "monday")];
        let groups = vec![group("G1", 30)];
        let classes = vec![class("C1", "T1", "G1", "projector")];

        let outcome = allocator.schedule_day("monday", &classes, &rooms, &slots, &groups);

        let placed = &outcome.classes[0];
        assert_eq!(placed.slot(), Some("MON1"));
        assert_eq!(placed.room(), Some("R01"));
        assert_eq!(placed.status, ClassStatus::Scheduled);
        assert_eq!(outcome.report.assigned_this_run, 1);
        assert_eq!(outcome.report.unscheduled_count, 0);
        assert_eq!(outcome.report.assigned_ids, vec!["C1".to_string()]);
        // 输入未被修改
        assert!(classes[0].slot_id.is_none());
    }

    #[test]
    fn test_capacity_too_small_leaves_unassigned() {
        let allocator = DayAllocator::new();
        let rooms = vec![room("R01", 10, &["projector"])];
        let slots = vec![slot("MON1", "monday")];
        let groups = vec![group("G1", 18)];
        let classes = vec![class("C1", "T1", "G1", "projector")];

        let outcome = allocator.schedule_day("monday", &classes, &rooms, &slots, &groups);
        assert_eq!(outcome.report.assigned_this_run, 0);
        assert_eq!(outcome.report.unscheduled_count, 1);
        assert_eq!(outcome.report.unassigned_ids, vec!["C1".to_string()]);
    }

    #[test]
    fn test_slot_major_room_minor_order() {
        let allocator = DayAllocator::new();
        let rooms = vec![room("R01", 40, &[]), room("R02", 40, &[])];
        let slots = vec![slot("MON1", "monday"), slot("MON2", "monday")];
        let groups = vec![group("G1", 10), group("G2", 10), group("G3", 10)];
        let classes = vec![
            class("C1", "T1", "G1", ""),
            class("C2", "T2", "G2", ""),
            class("C3", "T3", "G3", ""),
        ];

        let outcome = allocator.schedule_day("monday", &classes, &rooms, &slots, &groups);
        let placements: Vec<(Option<&str>, Option<&str>)> =
            outcome.classes.iter().map(|c| (c.slot(), c.room())).collect();
        assert_eq!(
            placements,
            vec![
                (Some("MON1"), Some("R01")),
                (Some("MON1"), Some("R02")),
                (Some("MON2"), Some("R01")),
            ]
        );
    }

    #[test]
    fn test_teacher_busy_not_retried() {
        let allocator = DayAllocator::new();
        let rooms = vec![room("R01", 40, &[]), room("R02", 40, &[])];
        let slots = vec![slot("MON1", "monday"), slot("MON2", "monday")];
        let groups = vec![group("G1", 10), group("G2", 10)];
        // 同一教师：第二节课首个可用组合为 (MON1, R02)，教师占用 → 不排
        let classes = vec![class("C1", "T1", "G1", ""), class("C2", "T1", "G2", "")];

        let outcome = allocator.schedule_day("monday", &classes, &rooms, &slots, &groups);
        assert_eq!(outcome.report.assigned_ids, vec!["C1".to_string()]);
        assert_eq!(outcome.report.unassigned_ids, vec!["C2".to_string()]);
        assert!(outcome.report.collisions.is_empty());
    }

    #[test]
    fn test_already_scheduled_untouched_and_blocks_combo() {
        let allocator = DayAllocator::new();
        let rooms = vec![room("R01", 40, &[])];
        let slots = vec![slot("MON1", "monday"), slot("MON2", "monday")];
        let groups = vec![group("G1", 10)];
        let mut existing = class("A", "T9", "G1", "");
        existing.slot_id = Some("MON1".to_string());
        existing.room_id = Some("R01".to_string());
        existing.status = ClassStatus::Moved;
        let classes = vec![existing.clone(), class("C1", "T1", "G1", "")];

        let outcome = allocator.schedule_day("monday", &classes, &rooms, &slots, &groups);
        assert_eq!(outcome.classes[0], existing);
        assert_eq!(outcome.classes[1].slot(), Some("MON2"));
        assert_eq!(outcome.report.scheduled_count, 2);
    }

    #[test]
    fn test_other_day_slots_ignored() {
        let allocator = DayAllocator::new();
        let rooms = vec![room("R01", 40, &[])];
        let slots = vec![slot("TUE1", "tuesday"), slot("MON1", "Monday")];
        let groups = vec![group("G1", 10)];
        let classes = vec![class("C1", "T1", "G1", "")];

        let outcome = allocator.schedule_day("MONDAY", &classes, &rooms, &slots, &groups);
        assert_eq!(outcome.classes[0].slot(), Some("MON1"));
    }

    #[test]
    fn test_unknown_group_skips_capacity_check() {
        let allocator = DayAllocator::new();
        let rooms = vec![room("R01", 0, &[])];
        let slots = vec![slot("MON1", "monday")];
        let classes = vec![class("C1", "T1", "G404", "")];

        let outcome = allocator.schedule_day("monday", &classes, &rooms, &slots, &[]);
        assert_eq!(outcome.report.assigned_this_run, 1);
    }

    #[test]
    fn test_detect_collisions_reports_duplicates() {
        let mut a = class("A", "T1", "G1", "");
        a.slot_id = Some("MON1".to_string());
        a.room_id = Some("R01".to_string());
        let mut b = class("B", "T1", "G2", "");
        b.slot_id = Some("MON1".to_string());
        b.room_id = Some("R01".to_string());

        let collisions = DayAllocator::detect_collisions(&[a, b]);
        assert_eq!(collisions.len(), 2);
        assert_eq!(
            collisions[0],
            Collision::RoomConflict {
                slot_id: "MON1".to_string(),
                room_id: "R01".to_string(),
                classes: ["A".to_string(), "B".to_string()],
            }
        );
        assert!(matches!(collisions[1], Collision::TeacherConflict { .. }));
    }
}
