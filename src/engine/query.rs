// ==========================================
// 课表排课引擎 - 课表查询
// ==========================================
// 职责: 课程筛选谓词 / 按天分组 / 空闲时间段 / 候选组合 / 教室冲突对
// 红线: 只读查询，不修改输入；迭代器均为惰性
// ==========================================

use crate::domain::resource::Room;
use crate::domain::timetable::{Class, Slot};
use crate::engine::feature_match::FeatureMatcher;
use std::collections::HashSet;

// ==========================================
// ClassFilter - 课程筛选谓词
// ==========================================
pub struct ClassFilter;

impl ClassFilter {
    /// 课程所在时间段属于指定星期
    pub fn by_day<'a>(day: &'a str, slots: &'a [Slot]) -> impl Fn(&Class) -> bool + 'a {
        move |class| match class.slot() {
            Some(slot_id) => slots.iter().any(|s| s.id == slot_id && s.is_on(day)),
            None => false,
        }
    }

    pub fn by_teacher(teacher_id: &str) -> impl Fn(&Class) -> bool + '_ {
        move |class| class.teacher_id == teacher_id
    }

    pub fn by_group(group_id: &str) -> impl Fn(&Class) -> bool + '_ {
        move |class| class.group_id == group_id
    }

    /// 课程教室位于指定教学楼
    pub fn by_building(building_id: &str, rooms: &[Room]) -> impl Fn(&Class) -> bool {
        let room_ids: HashSet<String> = rooms
            .iter()
            .filter(|r| r.building_id == building_id)
            .map(|r| r.id.clone())
            .collect();
        move |class| class.room().is_some_and(|room_id| room_ids.contains(room_id))
    }
}

// ==========================================
// 分组与查找
// ==========================================

/// 按星期分组已排课程
///
/// 星期按其在时间段列表中首次出现的顺序排列；没有课程的星期也会出现
pub fn nest_by_day<'a>(classes: &'a [Class], slots: &[Slot]) -> Vec<(String, Vec<&'a Class>)> {
    let mut days: Vec<&str> = Vec::new();
    for slot in slots {
        if !days.contains(&slot.day.as_str()) {
            days.push(slot.day.as_str());
        }
    }

    days.into_iter()
        .map(|day| {
            let slot_ids: HashSet<&str> = slots
                .iter()
                .filter(|s| s.day == day)
                .map(|s| s.id.as_str())
                .collect();
            let day_classes = classes
                .iter()
                .filter(|c| c.slot().is_some_and(|id| slot_ids.contains(id)))
                .collect();
            (day.to_string(), day_classes)
        })
        .collect()
}

/// 指定教室的空闲时间段（惰性）
pub fn free_slots_for_room<'a>(
    room_id: &str,
    classes: &[Class],
    slots: &'a [Slot],
) -> impl Iterator<Item = &'a Slot> {
    let occupied: HashSet<String> = classes
        .iter()
        .filter(|c| c.room() == Some(room_id))
        .filter_map(|c| c.slot_id.clone())
        .collect();

    slots.iter().filter(move |s| !occupied.contains(&s.id))
}

/// 课程的候选 (教室, 时间段) 组合（惰性，教室优先）
///
/// 只按设施需求过滤教室；占用、容量、教师冲突不在此处判断
pub fn candidate_assignments<'a>(
    class: &'a Class,
    rooms: &'a [Room],
    slots: &'a [Slot],
) -> impl Iterator<Item = (&'a Room, &'a Slot)> + 'a {
    rooms
        .iter()
        .filter(move |room| FeatureMatcher::room_satisfies(room, &class.needs))
        .flat_map(move |room| slots.iter().map(move |slot| (room, slot)))
}

/// 查找教室冲突对：同一教室、时间段的 星期/开始/结束 均相同
///
/// 每对只出现一次，顺序为 (先出现, 后出现)
pub fn find_room_conflicts<'a>(classes: &'a [Class], slots: &[Slot]) -> Vec<(&'a Class, &'a Class)> {
    let mut pairs = Vec::new();
    for (index, first) in classes.iter().enumerate() {
        let (Some(room_id), Some(first_slot)) = (first.room(), resolve_slot(first, slots)) else {
            continue;
        };

        for other in &classes[index + 1..] {
            if other.room() != Some(room_id) {
                continue;
            }
            let Some(other_slot) = resolve_slot(other, slots) else {
                continue;
            };
            if first_slot.is_on(&other_slot.day)
                && first_slot.start == other_slot.start
                && first_slot.end == other_slot.end
            {
                pairs.push((first, other));
            }
        }
    }
    pairs
}

fn resolve_slot<'s>(class: &Class, slots: &'s [Slot]) -> Option<&'s Slot> {
    let slot_id = class.slot()?;
    slots.iter().find(|s| s.id == slot_id)
}
