use serde::{Deserialize, Serialize};

use super::PrizeEntry;

/// 抽奖历史记录（奖品快照 + 时间）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub label: String,
    pub value: u64,
    pub weight: f64,
    pub color: String,
    /// 抽奖完成时间（本地时间，已格式化）
    pub date: String,
}

impl HistoryRecord {
    pub fn from_prize(prize: &PrizeEntry, date: String) -> Self {
        HistoryRecord {
            id: prize.id,
            label: prize.label.clone(),
            value: prize.value,
            weight: prize.weight,
            color: prize.color.clone(),
            date,
        }
    }
}

/// 最新记录放在最前，超出上限的旧记录丢弃
pub fn push_history(history: &mut Vec<HistoryRecord>, record: HistoryRecord, limit: usize) {
    history.insert(0, record);
    history.truncate(limit);
}
