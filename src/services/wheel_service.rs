use chrono::Local;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Write;

use crate::config::WheelConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    DEFAULT_NEW_PRIZE_COLOR, DEFAULT_NEW_PRIZE_WEIGHT, HistoryRecord, PrizeEntry, PrizeUpdate,
    SpinOutcome, default_prizes, next_prize_id, push_history,
};
use crate::storage::{
    KEY_REWARDS_CONFIG, KEY_SPIN_HISTORY, KEY_SPINS_LEFT, KEY_UNLIMITED_SPINS, Storage,
};
use crate::utils::{
    format_currency, normalize, sanitize_weight, select_weighted_index, validate_hex_color,
};

const MIN_PRIZES: usize = 2;

/// 幸运转盘控制器: 持有全部应用状态，通过注入的 Storage 持久化
pub struct WheelService<S: Storage> {
    config: WheelConfig,
    storage: S,
    rng: StdRng,
    prizes: Vec<PrizeEntry>,
    history: Vec<HistoryRecord>,
    spins_left: i64,
    unlimited_spins: bool,
    /// 正在转动时保存的中奖奖品
    pending: Option<PrizeEntry>,
}

impl<S: Storage> WheelService<S> {
    pub fn new(config: WheelConfig, storage: S) -> Self {
        Self::with_rng(config, storage, StdRng::from_entropy())
    }

    /// 使用指定随机源（测试中使用固定种子）
    pub fn with_rng(config: WheelConfig, storage: S, rng: StdRng) -> Self {
        let spins_left = config.spins_per_turn;
        let mut service = Self {
            config,
            storage,
            rng,
            prizes: default_prizes(),
            history: Vec::new(),
            spins_left,
            unlimited_spins: false,
            pending: None,
        };
        service.restore();
        service
    }

    pub fn prizes(&self) -> &[PrizeEntry] {
        &self.prizes
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn spins_left(&self) -> i64 {
        self.spins_left
    }

    pub fn is_unlimited(&self) -> bool {
        self.unlimited_spins
    }

    pub fn is_spinning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 抽奖 (Spin)
    ///
    /// 逻辑:
    /// 1. 正在转动时拒绝
    /// 2. 非无限模式下校验剩余次数
    /// 3. 按权重抽取，并按 id 定位其在列表中的位置
    /// 4. 标记转动中，扣减并保存剩余次数
    pub fn spin(&mut self) -> AppResult<SpinOutcome> {
        if self.is_spinning() {
            return Err(AppError::SpinInProgress);
        }
        if !self.unlimited_spins && self.spins_left <= 0 {
            return Err(AppError::NoSpinsLeft);
        }

        let winner = select_weighted_index(&self.prizes, &mut self.rng)
            .map(|idx| self.prizes[idx].clone())
            .ok_or_else(|| AppError::InvalidDistribution("No prizes configured".into()))?;

        let index = self
            .prizes
            .iter()
            .position(|p| p.id == winner.id)
            .ok_or_else(|| AppError::InternalError(format!("Prize {} vanished", winner.id)))?;

        // 保存成功后才更新内存状态
        if !self.unlimited_spins {
            let spins_left = self.spins_left - 1;
            save_json(&mut self.storage, KEY_SPINS_LEFT, &spins_left)?;
            self.spins_left = spins_left;
        }
        self.pending = Some(winner.clone());

        log::info!(
            "Spin started: prize {} ({}) at index {index}",
            winner.id,
            winner.label
        );

        Ok(SpinOutcome {
            prize: winner,
            index,
            spins_left: (!self.unlimited_spins).then_some(self.spins_left),
        })
    }

    /// 转盘动画结束: 写入历史记录（最新在前，超出上限丢弃）
    pub fn finish_spin(&mut self) -> AppResult<HistoryRecord> {
        let winner = self.pending.clone().ok_or(AppError::NoSpinInProgress)?;

        let mut date = String::new();
        if write!(date, "{}", Local::now().format(&self.config.date_format)).is_err() {
            log::warn!("Invalid date format {:?}, using RFC 3339", self.config.date_format);
            date = Local::now().to_rfc3339();
        }
        let record = HistoryRecord::from_prize(&winner, date);
        let mut history = self.history.clone();
        push_history(&mut history, record.clone(), self.config.history_limit);
        save_json(&mut self.storage, KEY_SPIN_HISTORY, &history)?;
        self.history = history;
        self.pending = None;

        log::info!("Spin finished: {} won", record.label);
        Ok(record)
    }

    /// 开始新一轮: 重置剩余次数
    pub fn next_turn(&mut self) -> AppResult<()> {
        if self.is_spinning() {
            return Err(AppError::SpinInProgress);
        }
        save_json(&mut self.storage, KEY_SPINS_LEFT, &self.config.spins_per_turn)?;
        self.spins_left = self.config.spins_per_turn;
        Ok(())
    }

    /// 清空历史并重置次数
    pub fn reset_all(&mut self) -> AppResult<()> {
        self.storage.remove(KEY_SPIN_HISTORY)?;
        self.history.clear();
        save_json(&mut self.storage, KEY_SPINS_LEFT, &self.config.spins_per_turn)?;
        self.spins_left = self.config.spins_per_turn;
        log::info!("History and spins reset");
        Ok(())
    }

    pub fn set_unlimited_spins(&mut self, enabled: bool) -> AppResult<()> {
        save_json(&mut self.storage, KEY_UNLIMITED_SPINS, &enabled)?;
        self.unlimited_spins = enabled;
        Ok(())
    }

    pub fn add_prize(&mut self) -> AppResult<&PrizeEntry> {
        let id = next_prize_id(&self.prizes);
        let mut prizes = self.prizes.clone();
        prizes.push(PrizeEntry {
            id,
            label: self.label_for(0),
            value: 0,
            weight: DEFAULT_NEW_PRIZE_WEIGHT,
            color: DEFAULT_NEW_PRIZE_COLOR.to_string(),
        });
        self.replace_prizes(normalize(&prizes))?;
        log::info!("Prize {id} added");

        let idx = self.prizes.len() - 1;
        Ok(&self.prizes[idx])
    }

    pub fn remove_prize(&mut self, id: i64) -> AppResult<()> {
        if self.prizes.len() <= self.min_prizes() {
            return Err(AppError::ValidationError(format!(
                "At least {} prizes are required",
                self.min_prizes()
            )));
        }
        if !self.prizes.iter().any(|p| p.id == id) {
            return Err(AppError::NotFound(format!("Prize {id} not found")));
        }

        let remaining: Vec<PrizeEntry> = self
            .prizes
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        self.replace_prizes(normalize(&remaining))?;
        log::info!("Prize {id} removed");
        Ok(())
    }

    /// 修改单个奖品: 金额会同步更新展示文本，权重修改后整体重新归一化
    pub fn update_prize(&mut self, id: i64, update: PrizeUpdate) -> AppResult<&PrizeEntry> {
        if let PrizeUpdate::Color(color) = &update {
            validate_hex_color(color)?;
        }

        let mut prizes = self.prizes.clone();
        let prize = prizes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Prize {id} not found")))?;

        let renormalize = match update {
            PrizeUpdate::Value(value) => {
                prize.value = value;
                prize.label = self.label_for(value);
                false
            }
            PrizeUpdate::Weight(weight) => {
                prize.weight = sanitize_weight(weight);
                true
            }
            PrizeUpdate::Color(color) => {
                prize.color = color;
                false
            }
        };

        if renormalize {
            prizes = normalize(&prizes);
        }
        self.replace_prizes(prizes)?;

        self.prizes
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::InternalError(format!("Prize {id} vanished")))
    }

    /// 导出奖品配置（格式化 JSON）
    pub fn export_config(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.prizes)?)
    }

    /// 导入奖品配置
    ///
    /// 无法解析、少于最少条数或 id 重复时忽略本次导入并保留原配置，返回 false。
    pub fn import_config(&mut self, raw: &str) -> AppResult<bool> {
        let prizes = match self.parse_prizes(raw.as_bytes()) {
            Ok(prizes) => prizes,
            Err(e) => {
                log::warn!("Ignoring prize config override: {e}");
                return Ok(false);
            }
        };
        self.replace_prizes(normalize(&prizes))?;
        log::info!("Prize config imported: {} prizes", self.prizes.len());
        Ok(true)
    }

    // -----------------------------
    // 内部辅助方法
    // -----------------------------

    /// 配置值低于 2 时仍按 2 处理
    fn min_prizes(&self) -> usize {
        self.config.min_prizes.max(MIN_PRIZES)
    }

    fn label_for(&self, value: u64) -> String {
        format_currency(
            value,
            &self.config.thousands_separator,
            &self.config.currency_symbol,
        )
    }

    fn parse_prizes(&self, bytes: &[u8]) -> AppResult<Vec<PrizeEntry>> {
        let prizes: Vec<PrizeEntry> = serde_json::from_slice(bytes)?;
        if prizes.len() < self.min_prizes() {
            return Err(AppError::ValidationError(format!(
                "Expected at least {} prizes, got {}",
                self.min_prizes(),
                prizes.len()
            )));
        }
        let mut ids: Vec<i64> = prizes.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return Err(AppError::ValidationError("Duplicate prize id".into()));
        }
        Ok(prizes)
    }

    fn replace_prizes(&mut self, prizes: Vec<PrizeEntry>) -> AppResult<()> {
        save_json(&mut self.storage, KEY_REWARDS_CONFIG, &prizes)?;
        self.prizes = prizes;
        Ok(())
    }

    fn load_bytes(&self, key: &str) -> Option<Vec<u8>> {
        match self.storage.load(key) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to load {key}: {e}");
                None
            }
        }
    }

    fn load_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.load_bytes(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring malformed {key}: {e}");
                None
            }
        }
    }

    /// 启动时从存储恢复状态，损坏的数据忽略并保留默认值
    fn restore(&mut self) {
        if let Some(bytes) = self.load_bytes(KEY_REWARDS_CONFIG) {
            match self.parse_prizes(&bytes) {
                Ok(prizes) => self.prizes = prizes,
                Err(e) => log::warn!("Ignoring malformed {KEY_REWARDS_CONFIG}: {e}"),
            }
        }
        if let Some(history) = self.load_key::<Vec<HistoryRecord>>(KEY_SPIN_HISTORY) {
            self.history = history;
            self.history.truncate(self.config.history_limit);
        }
        if let Some(spins_left) = self.load_key::<i64>(KEY_SPINS_LEFT) {
            self.spins_left = spins_left;
        }
        if let Some(unlimited) = self.load_key::<bool>(KEY_UNLIMITED_SPINS) {
            self.unlimited_spins = unlimited;
        }
        log::debug!(
            "Wheel state restored: {} prizes, {} history records, {} spins left",
            self.prizes.len(),
            self.history.len(),
            self.spins_left
        );
    }
}

fn save_json<S: Storage, T: Serialize + ?Sized>(
    storage: &mut S,
    key: &str,
    value: &T,
) -> AppResult<()> {
    let bytes = serde_json::to_vec(value)?;
    storage.save(key, &bytes)
}
