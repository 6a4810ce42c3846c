//! Small numeric helpers shared by the report modules.
//!
//! Every ratio goes through [`ratio`], so a zero denominator becomes `None`
//! rather than NaN or infinity.

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Percentage rounded to one decimal.
pub fn percent(numerator: f64, denominator: f64) -> Option<f64> {
    ratio(numerator, denominator).map(|r| round_to(r * 100.0, 1))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    ratio(values.iter().sum(), values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Sample standard deviation (n - 1); zero with fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Most frequent value; ties go to the smallest.
pub fn mode<T: Ord + Clone>(values: &[T]) -> Option<T> {
    let mut counts: std::collections::BTreeMap<&T, usize> = std::collections::BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let best = counts.values().copied().max()?;
    counts
        .into_iter()
        .find(|(_, c)| *c == best)
        .map(|(v, _)| v.clone())
}

/// Item with the largest key; the earliest wins a tie.
pub fn first_max_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    let mut best: Option<(f64, T)> = None;
    for item in items {
        let k = key(&item);
        if best.as_ref().map_or(true, |(b, _)| k > *b) {
            best = Some((k, item));
        }
    }
    best.map(|(_, item)| item)
}

/// Item with the smallest key; the earliest wins a tie.
pub fn first_min_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    first_max_by(items, |item| -key(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.36, 1), 2.4);
        assert_eq!(round_to(2.34, 1), 2.3);
        assert_eq!(round_to(57.142857, 1), 57.1);
        assert_eq!(round_to(-1.005, 0), -1.0);
    }

    #[test]
    fn test_ratio_guards_zero() {
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(percent(3.0, 4.0), Some(75.0));
    }

    #[test]
    fn test_median_and_std() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
        assert_eq!(sample_std(&[5.0]), 0.0);
        assert!((sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.138).abs() < 1e-3);
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        let v = vec!["WR", "RB", "WR", "RB", "TE"];
        assert_eq!(mode(&v), Some("RB"));
        assert_eq!(mode::<u8>(&[]), None);
    }

    #[test]
    fn test_first_max_keeps_earliest() {
        let items = [("a", 3.0), ("b", 5.0), ("c", 5.0), ("d", 1.0)];
        assert_eq!(first_max_by(items, |i| i.1).map(|i| i.0), Some("b"));
        assert_eq!(first_min_by(items, |i| i.1).map(|i| i.0), Some("d"));
        assert_eq!(first_max_by(Vec::<(u8, f64)>::new(), |i| i.1), None);
    }
}
