use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::sanitize_weight;

pub const DEFAULT_NEW_PRIZE_WEIGHT: f64 = 10.0;
pub const DEFAULT_NEW_PRIZE_COLOR: &str = "#D32F2F";

/// 奖品（转盘上的一个扇区）
/// 概念说明:
/// - weight: 相对权重，仅与同一列表中的其它奖品比较才有意义
/// - label: 由 value 经货币格式化得到，仅用于展示
/// - color: 仅用于展示，不参与抽奖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeEntry {
    pub id: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: u64,
    /// 缺失或非数字的权重按 0 处理
    #[serde(default, deserialize_with = "lenient_weight")]
    pub weight: f64,
    #[serde(default = "default_color")]
    pub color: String,
}

/// 管理面板对单个奖品的修改
#[derive(Debug, Clone, PartialEq)]
pub enum PrizeUpdate {
    Value(u64),
    Weight(f64),
    Color(String),
}

fn default_color() -> String {
    DEFAULT_NEW_PRIZE_COLOR.to_string()
}

impl PrizeEntry {
    pub fn new(id: i64, label: impl Into<String>, value: u64, weight: f64, color: &str) -> Self {
        Self {
            id,
            label: label.into(),
            value,
            weight,
            color: color.to_string(),
        }
    }
}

/// 默认奖品配置（总权重 100）
pub fn default_prizes() -> Vec<PrizeEntry> {
    vec![
        PrizeEntry::new(1, "10,000₫", 10_000, 45.0, "#FFEB3B"),
        PrizeEntry::new(2, "20,000₫", 20_000, 30.0, "#D32F2F"),
        PrizeEntry::new(3, "50,000₫", 50_000, 15.0, "#FFEB3B"),
        PrizeEntry::new(4, "100,000₫", 100_000, 7.0, "#D32F2F"),
        PrizeEntry::new(5, "200,000₫", 200_000, 2.0, "#FFEB3B"),
        PrizeEntry::new(6, "500,000₫", 500_000, 1.0, "#D32F2F"),
    ]
}

/// 下一个可用 ID: max(现有 ID, 0) + 1
pub fn next_prize_id(prizes: &[PrizeEntry]) -> i64 {
    prizes.iter().map(|p| p.id).max().unwrap_or(0).max(0) + 1
}

/// 宽松解析权重: 数字直接使用，数字字符串尝试解析，其它一律为 0
fn lenient_weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let weight = match raw {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        serde_json::Value::Bool(b) => {
            if b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    Ok(sanitize_weight(weight))
}
