//! Selection strategies
//!
//! Each function picks one index from an ordered, already-filtered candidate
//! list. Order matters: it is the rotation order for round-robin, the
//! accumulation order for weighted draws and the tie-breaker everywhere else.
//! All functions return `None` only for an empty list.

use rand::{Rng, RngCore};

use crate::adapter::AdapterStats;

/// Weight of the success rate in the adaptive score.
pub const SUCCESS_RATE_WEIGHT: f64 = 0.6;

/// Weight of the latency score in the adaptive score.
pub const LATENCY_WEIGHT: f64 = 0.4;

/// Success rate assumed for an adapter with no dispatches yet.
pub const NO_DATA_SUCCESS_RATE: f64 = 0.5;

/// Latency score assumed for an adapter with no latency average yet.
pub const NO_DATA_LATENCY_SCORE: f64 = 1.0;

/// What a strategy may look at for one candidate
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub name: &'a str,
    pub priority: f64,
    pub stats: &'a AdapterStats,
}

/// `cursor mod len`, where the cursor is the router-wide request counter
pub fn round_robin(candidates: &[Candidate<'_>], cursor: u64) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    Some((cursor % candidates.len() as u64) as usize)
}

/// Priority-weighted random draw.
///
/// Draws uniformly from `[0, total_weight)` and returns the first candidate
/// whose cumulative weight exceeds the draw. Zero-weight candidates are never
/// drawn unless every weight is zero, in which case the first candidate wins.
pub fn weighted(candidates: &[Candidate<'_>], rng: &mut dyn RngCore) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let total: f64 = candidates.iter().map(|c| c.priority.max(0.0)).sum();
    if !total.is_finite() || total <= 0.0 {
        return Some(0);
    }

    let draw = rng.gen_range(0.0..total);
    let mut accumulated = 0.0;
    for (idx, candidate) in candidates.iter().enumerate() {
        accumulated += candidate.priority.max(0.0);
        if accumulated > draw {
            return Some(idx);
        }
    }
    // float accumulation can land just short of `total`
    Some(0)
}

/// `0.6 * success_rate + 0.4 * latency_score`, with explicit no-data priors
pub fn adaptive_score(stats: &AdapterStats) -> f64 {
    let success_rate = stats.success_rate().unwrap_or(NO_DATA_SUCCESS_RATE);
    let latency_score = if stats.avg_latency_ms > 0.0 {
        100.0 / stats.avg_latency_ms
    } else {
        NO_DATA_LATENCY_SCORE
    };
    SUCCESS_RATE_WEIGHT * success_rate + LATENCY_WEIGHT * latency_score
}

/// Strictly highest adaptive score; ties go to the earliest candidate
pub fn adaptive(candidates: &[Candidate<'_>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let score = adaptive_score(candidate.stats);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Strictly lowest average latency; ties go to the earliest candidate.
///
/// Adapters without observations sit at 0ms, so each gets probed once.
pub fn lowest_latency(candidates: &[Candidate<'_>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let latency = candidate.stats.avg_latency_ms;
        match best {
            Some((_, lowest)) if latency >= lowest => {}
            _ => best = Some((idx, latency)),
        }
    }
    best.map(|(idx, _)| idx)
}
