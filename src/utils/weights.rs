use rand::Rng;

use crate::models::PrizeEntry;

/// 归一化后的目标总权重
pub const TOTAL_WEIGHT: f64 = 100.0;

/// 权重清洗: NaN / 无穷 / 负数一律视为 0
pub fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 清洗后按最大值缩放到 [0, 1]，求和时不会溢出；全部为 0 时返回 None
fn scaled_weights(entries: &[PrizeEntry]) -> Option<Vec<f64>> {
    let weights: Vec<f64> = entries.iter().map(|e| sanitize_weight(e.weight)).collect();
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max == 0.0 {
        return None;
    }
    Some(weights.into_iter().map(|w| w / max).collect())
}

/// 将权重按比例缩放为总和 100（保留两位小数）
///
/// - 全部为 0 时平均分配
/// - 各项独立四舍五入，总和允许有 ±0.01 * count 的误差，不做末项补偿
pub fn normalize(entries: &[PrizeEntry]) -> Vec<PrizeEntry> {
    if entries.is_empty() {
        return Vec::new();
    }

    let Some(scaled) = scaled_weights(entries) else {
        let equal = round2(TOTAL_WEIGHT / entries.len() as f64);
        return entries
            .iter()
            .map(|e| PrizeEntry {
                weight: equal,
                ..e.clone()
            })
            .collect();
    };

    let sum: f64 = scaled.iter().sum();
    entries
        .iter()
        .zip(scaled)
        .map(|(e, w)| PrizeEntry {
            weight: round2(w / sum * TOTAL_WEIGHT),
            ..e.clone()
        })
        .collect()
}

/// 按权重随机选出一个下标
///
/// 逻辑:
/// 1. 在 [0, total) 内取随机数 r
/// 2. 顺序遍历: r < weight 则命中，否则 r -= weight 继续
/// 3. 浮点误差导致遍历结束仍未命中时返回第一个
///
/// 没有正权重时不抽取，直接返回第一个。空列表返回 None。
pub fn select_weighted_index<R: Rng + ?Sized>(entries: &[PrizeEntry], rng: &mut R) -> Option<usize> {
    if entries.is_empty() {
        return None;
    }

    let Some(scaled) = scaled_weights(entries) else {
        return Some(0);
    };

    let total: f64 = scaled.iter().sum();
    let mut remaining = rng.gen_range(0.0..total);
    for (idx, weight) in scaled.into_iter().enumerate() {
        if remaining < weight {
            return Some(idx);
        }
        remaining -= weight;
    }

    Some(0)
}

pub fn select_weighted<'a, R: Rng + ?Sized>(
    entries: &'a [PrizeEntry],
    rng: &mut R,
) -> Option<&'a PrizeEntry> {
    select_weighted_index(entries, rng).map(|idx| &entries[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_prizes;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entries(weights: &[f64]) -> Vec<PrizeEntry> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| PrizeEntry::new(i as i64 + 1, format!("p{i}"), 0, *w, "#FFEB3B"))
            .collect()
    }

    fn weights(entries: &[PrizeEntry]) -> Vec<f64> {
        entries.iter().map(|e| e.weight).collect()
    }

    #[test]
    fn test_sanitize_weight() {
        assert_eq!(sanitize_weight(12.5), 12.5);
        assert_eq!(sanitize_weight(-1.0), 0.0);
        assert_eq!(sanitize_weight(f64::NAN), 0.0);
        assert_eq!(sanitize_weight(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_normalize_equal_split_on_zero() {
        assert_eq!(weights(&normalize(&entries(&[0.0, 0.0]))), vec![50.0, 50.0]);
        assert_eq!(
            weights(&normalize(&entries(&[0.0, 0.0, 0.0]))),
            vec![33.33, 33.33, 33.33]
        );
    }

    #[test]
    fn test_normalize_preserves_proportions() {
        assert_eq!(weights(&normalize(&entries(&[1.0, 3.0]))), vec![25.0, 75.0]);
    }

    #[test]
    fn test_normalize_sum_within_tolerance() {
        let cases: [&[f64]; 4] = [
            &[1.0, 1.0, 1.0],
            &[7.0, 13.0, 0.5, 2.25, 99.0],
            &[0.001, 1000.0],
            &[3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0],
        ];
        for case in cases {
            let normalized = normalize(&entries(case));
            let sum: f64 = normalized.iter().map(|e| e.weight).sum();
            assert!(
                (sum - 100.0).abs() <= 0.01 * case.len() as f64 + 1e-9,
                "sum {sum} for {case:?}"
            );
        }
    }

    #[test]
    fn test_normalize_treats_malformed_weights_as_zero() {
        let normalized = normalize(&entries(&[f64::NAN, -5.0, 10.0]));
        assert_eq!(weights(&normalized), vec![0.0, 0.0, 100.0]);
    }

    #[test]
    fn test_normalize_keeps_order_and_identity() {
        let input = default_prizes();
        let normalized = normalize(&input);
        assert_eq!(normalized.len(), input.len());
        for (a, b) in input.iter().zip(normalized.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.label, b.label);
            assert_eq!(a.value, b.value);
            assert_eq!(a.color, b.color);
        }
    }

    #[test]
    fn test_normalize_default_seed_unchanged() {
        assert_eq!(
            weights(&normalize(&default_prizes())),
            vec![45.0, 30.0, 15.0, 7.0, 2.0, 1.0]
        );
    }

    #[test]
    fn test_normalize_huge_weights_do_not_overflow() {
        assert_eq!(weights(&normalize(&entries(&[1e308, 1e308]))), vec![50.0, 50.0]);
        assert_eq!(
            weights(&normalize(&entries(&[f64::MAX, f64::MAX, 0.0, f64::MAX / 2.0]))),
            vec![40.0, 40.0, 0.0, 20.0]
        );
    }

    #[test]
    fn test_select_huge_weights_reach_every_entry() {
        let list = entries(&[1e308, 1e308]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut second = 0;
        for _ in 0..1_000 {
            if select_weighted_index(&list, &mut rng) == Some(1) {
                second += 1;
            }
        }
        assert!((400..=600).contains(&second), "second selected {second} times");
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_select_respects_distribution() {
        let list = entries(&[90.0, 10.0]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut first = 0;
        for _ in 0..100_000 {
            if select_weighted_index(&list, &mut rng) == Some(0) {
                first += 1;
            }
        }
        assert!((87_000..=93_000).contains(&first), "first selected {first} times");
    }

    #[test]
    fn test_select_returns_member_of_input() {
        let list = entries(&[5.0, 0.0, 12.0, 3.5]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let picked = select_weighted(&list, &mut rng).unwrap();
            assert!(list.iter().any(|e| e.id == picked.id));
            assert_ne!(picked.id, 2, "zero-weight entry must never win");
        }
    }

    #[test]
    fn test_select_zero_total_falls_back_to_first() {
        let list = entries(&[0.0, 0.0, 0.0]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(select_weighted_index(&list, &mut rng), Some(0));
        }
    }

    #[test]
    fn test_select_negative_total_falls_back_to_first() {
        let list = entries(&[-10.0, -1.0]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_weighted(&list, &mut rng).map(|e| e.id), Some(1));
    }

    #[test]
    fn test_select_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_weighted(&[], &mut rng).is_none());
    }

    #[test]
    fn test_default_seed_most_common_winner() {
        let list = default_prizes();
        let mut rng = StdRng::seed_from_u64(2026);
        let mut counts = [0usize; 6];
        for _ in 0..1_000 {
            let idx = select_weighted_index(&list, &mut rng).unwrap();
            counts[idx] += 1;
        }
        let (best, _) = counts.iter().enumerate().max_by_key(|(_, c)| **c).unwrap();
        assert_eq!(list[best].value, 10_000);
    }
}
