use serde::Serialize;

use super::PrizeEntry;

/// 抽奖（Spin）结果
#[derive(Debug, Clone, Serialize)]
pub struct SpinOutcome {
    /// 获得的奖品
    pub prize: PrizeEntry,
    /// 奖品在当前列表中的位置（驱动转盘动画停止位置）
    pub index: usize,
    /// 剩余抽奖次数（无限模式下为 None）
    pub spins_left: Option<i64>,
}
