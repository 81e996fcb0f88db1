//! Collection-level term statistics.

use crate::index::InvertedIndex;
use serde::Serialize;

/// The `n` most frequent terms by collection frequency, ties by term.
pub fn top_terms(index: &InvertedIndex, n: usize) -> Vec<(String, u64)> {
    let mut terms: Vec<(String, u64)> = index
        .terms()
        .map(|t| (t.to_string(), index.collection_frequency(t)))
        .collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    terms.truncate(n);
    terms
}

/// Collection frequency of every term, highest first.
pub fn rank_frequencies(index: &InvertedIndex) -> Vec<u64> {
    let mut freqs: Vec<u64> = index.terms().map(|t| index.collection_frequency(t)).collect();
    freqs.sort_unstable_by(|a, b| b.cmp(a));
    freqs
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZipfFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub ranks: usize,
}

/// Least-squares fit of `ln(freq) = intercept + slope * ln(rank)` over the
/// `max_ranks` highest frequencies.
///
/// Returns `None` with fewer than two non-zero frequencies.
pub fn zipf_fit(frequencies: &[u64], max_ranks: usize) -> Option<ZipfFit> {
    let mut freqs: Vec<u64> = frequencies.iter().copied().filter(|&f| f > 0).collect();
    freqs.sort_unstable_by(|a, b| b.cmp(a));
    freqs.truncate(max_ranks);
    if freqs.len() < 2 {
        return None;
    }

    let points: Vec<(f64, f64)> = freqs
        .iter()
        .enumerate()
        .map(|(i, &f)| (((i + 1) as f64).ln(), (f as f64).ln()))
        .collect();
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    let sxy: f64 = points.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_tot: f64 = points.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();
    // flat frequencies are fit exactly by a zero slope
    let r_squared = if ss_tot < 1e-12 { 1.0 } else { 1.0 - ss_res / ss_tot };

    Some(ZipfFit { slope, intercept, r_squared, ranks: points.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_power_law_is_recovered() {
        // f = 1200 / r
        let freqs: Vec<u64> = (1..=6).map(|r| 1200 / r).collect();
        let fit = zipf_fit(&freqs, 1000).unwrap();
        assert!((fit.slope + 1.0).abs() < 1e-9);
        assert!((fit.intercept - 1200f64.ln()).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(fit.ranks, 6);
    }

    #[test]
    fn too_few_points() {
        assert!(zipf_fit(&[], 10).is_none());
        assert!(zipf_fit(&[5, 0, 0], 10).is_none());
        assert!(zipf_fit(&[5, 4, 3], 1).is_none());
    }

    #[test]
    fn flat_frequencies() {
        let fit = zipf_fit(&[3, 3, 3], 10).unwrap();
        assert!(fit.slope.abs() < 1e-9);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn top_terms_breaks_ties_by_term() {
        let index = InvertedIndex::from_texts(vec![
            (1, "zebra apple apple"),
            (2, "mango zebra"),
        ])
        .unwrap();
        assert_eq!(
            top_terms(&index, 2),
            vec![("apple".to_string(), 2), ("zebra".to_string(), 2)]
        );
        assert_eq!(rank_frequencies(&index), vec![2, 2, 1]);
    }
}
