use std::cmp::Ordering;

use tracing::debug;

use crate::constants::{MIN_SCORE, RESULT_TOPK, STD_FACTOR};

use super::types::ScoreResult;

/// Distribution statistics of one query's candidate scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionStats {
    pub count: usize,
    /// Population mean.
    pub mean: f32,
    /// Population standard deviation.
    pub std: f32,
    /// Score at index `floor(0.9 * (n - 1))` of the ascending sort.
    pub p90: f32,
    pub threshold: f32,
}

impl SelectionStats {
    /// Computes the statistics; `None` for an empty slice.
    pub fn from_scores(scores: &[f32]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        let n = scores.len() as f64;
        let mean = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
        let variance = scores
            .iter()
            .map(|&s| {
                let d = f64::from(s) - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let std = variance.sqrt();

        let mut sorted = scores.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let p90_index = ((0.9 * (scores.len() - 1) as f64).floor() as usize).min(sorted.len() - 1);
        let p90 = f64::from(sorted[p90_index]);

        let threshold = p90
            .max(mean + f64::from(STD_FACTOR) * std)
            .max(f64::from(MIN_SCORE));

        Some(Self {
            count: scores.len(),
            mean: mean as f32,
            std: std as f32,
            p90: p90 as f32,
            threshold: threshold as f32,
        })
    }
}

/// Outcome of [`select`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Ranked results, highest score first, at most `RESULT_TOPK` long.
    pub results: Vec<ScoreResult>,
    /// `None` when there were no candidates.
    pub stats: Option<SelectionStats>,
    /// `true` when nothing cleared the threshold and the plain top-k was returned.
    pub fell_back: bool,
}

/// Reduces a query's full candidate list to a bounded, ranked result.
///
/// Ties keep their original candidate order.
pub fn select(candidates: Vec<ScoreResult>) -> Selection {
    let scores: Vec<f32> = candidates.iter().map(|c| c.score).collect();
    let Some(stats) = SelectionStats::from_scores(&scores) else {
        return Selection {
            results: Vec::new(),
            stats: None,
            fell_back: false,
        };
    };

    let mut ranked = candidates;
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let above = ranked
        .iter()
        .take_while(|c| c.score >= stats.threshold)
        .count();

    let fell_back = above == 0;
    let keep = if fell_back {
        RESULT_TOPK
    } else {
        above.min(RESULT_TOPK)
    };
    ranked.truncate(keep);

    debug!(
        candidates = stats.count,
        mean = stats.mean,
        std = stats.std,
        p90 = stats.p90,
        threshold = stats.threshold,
        selected = ranked.len(),
        fell_back,
        "Selected semantic results"
    );

    Selection {
        results: ranked,
        stats: Some(stats),
        fell_back,
    }
}

/// Convenience wrapper returning only the ranked results of [`select`].
pub fn select_scores(candidates: Vec<ScoreResult>) -> Vec<ScoreResult> {
    select(candidates).results
}
