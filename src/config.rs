use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub wheel: WheelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelConfig {
    /// 每轮可用的抽奖次数
    #[serde(default = "default_spins_per_turn")]
    pub spins_per_turn: i64,
    /// 历史记录保留条数
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// 奖品列表最少条数
    #[serde(default = "default_min_prizes")]
    pub min_prizes: usize,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
    /// 历史记录时间格式 (chrono strftime)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_spins_per_turn() -> i64 {
    5
}

fn default_history_limit() -> usize {
    10
}

fn default_min_prizes() -> usize {
    2
}

fn default_currency_symbol() -> String {
    "₫".to_string()
}

fn default_thousands_separator() -> String {
    ".".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y %H:%M:%S".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            spins_per_turn: default_spins_per_turn(),
            history_limit: default_history_limit(),
            min_prizes: default_min_prizes(),
            currency_symbol: default_currency_symbol(),
            thousands_separator: default_thousands_separator(),
            date_format: default_date_format(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量与默认值
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::from_toml_str(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config = toml::from_str(config_str).map_err(|e| format!("解析配置文件失败: {e}"))?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("WHEEL_SPINS_PER_TURN")
            && let Ok(n) = v.parse()
        {
            self.wheel.spins_per_turn = n;
        }
        if let Ok(v) = env::var("WHEEL_HISTORY_LIMIT")
            && let Ok(n) = v.parse()
        {
            self.wheel.history_limit = n;
        }
        if let Ok(v) = env::var("WHEEL_MIN_PRIZES")
            && let Ok(n) = v.parse()
        {
            self.wheel.min_prizes = n;
        }
        if let Ok(v) = env::var("WHEEL_CURRENCY_SYMBOL") {
            self.wheel.currency_symbol = v;
        }
        if let Ok(v) = env::var("WHEEL_THOUSANDS_SEPARATOR") {
            self.wheel.thousands_separator = v;
        }
        if let Ok(v) = env::var("WHEEL_DATE_FORMAT") {
            self.wheel.date_format = v;
        }
        if let Ok(v) = env::var("STORAGE_DATA_DIR") {
            self.storage.data_dir = v;
        }
    }
}
