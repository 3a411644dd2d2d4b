// ==========================================
// 课表排课引擎 - 设施匹配纯函数库
// ==========================================
// 职责: 教室设施标签与课程需求的匹配判定
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================
// 规则: 双向子串匹配（需求是某设施的子串，或某设施是需求的子串）
// 说明: 可容忍数据中的拼写偏差，如 "lectoruim" / "lectorium"
// ==========================================

use crate::domain::resource::Room;
use crate::domain::timetable::Needs;

// ==========================================
// FeatureMatcher - 纯函数工具类
// ==========================================
pub struct FeatureMatcher;

impl FeatureMatcher {
    /// 归一化设施标签（小写、去空白、去空串）
    ///
    /// 空标签会被丢弃，否则空串作为子串会匹配任意需求
    pub fn normalize_features(features: &[String]) -> Vec<String> {
        features
            .iter()
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect()
    }

    /// 单个需求是否被某个设施标签满足
    ///
    /// # 参数
    /// - need: 已归一化的需求标签
    /// - features: 已归一化的设施标签
    pub fn need_satisfied(need: &str, features: &[String]) -> bool {
        features
            .iter()
            .any(|feature| feature.contains(need) || need.contains(feature.as_str()))
    }

    /// 教室设施是否满足全部需求
    ///
    /// # 规则
    /// - 需求为空 → 恒满足
    /// - 每一个需求都必须被至少一个设施标签满足
    pub fn satisfies(needs: &Needs, features: &[String]) -> bool {
        let tokens = needs.tokens();
        if tokens.is_empty() {
            return true;
        }

        let features = Self::normalize_features(features);
        tokens
            .iter()
            .all(|need| Self::need_satisfied(need, &features))
    }

    /// 教室是否满足课程需求
    pub fn room_satisfies(room: &Room, needs: &Needs) -> bool {
        Self::satisfies(needs, &room.features)
    }

    /// 返回未被满足的需求（用于校验报错说明）
    pub fn missing_needs(needs: &Needs, features: &[String]) -> Vec<String> {
        let features = Self::normalize_features(features);
        needs
            .tokens()
            .into_iter()
            .filter(|need| !Self::need_satisfied(need, &features))
            .collect()
    }
}
