//! Key/value persistence for wheel state.
//!
//! The service only talks to the [`Storage`] trait; values are opaque bytes
//! (JSON in practice). `MemoryStorage` backs tests, `FileStorage` keeps one
//! file per key under a data directory.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::AppResult;

pub const KEY_REWARDS_CONFIG: &str = "rewardsConfig";
pub const KEY_SPIN_HISTORY: &str = "spinHistory";
pub const KEY_SPINS_LEFT: &str = "spinsLeft";
pub const KEY_UNLIMITED_SPINS: &str = "unlimitedSpins";

pub trait Storage {
    /// 读取键值，不存在返回 None
    fn load(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    fn save(&mut self, key: &str, value: &[u8]) -> AppResult<()>;

    /// 删除键值，不存在时视为成功
    fn remove(&mut self, key: &str) -> AppResult<()>;
}
