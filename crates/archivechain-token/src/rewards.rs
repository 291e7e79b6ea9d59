//! Reward formulas (spec §4.4), grounded on the original system's
//! `ARCToken.calculate_*_reward` methods. All outputs are ultimately clamped
//! by `MAX_REWARD_AMOUNT` inside `calculate_reward_safely`.

use archivechain_core::constants::{
    BANDWIDTH_REWARD_MAX, BANDWIDTH_REWARD_MIN, DISCOVERY_REWARD_BASE, DISCOVERY_REWARD_SPAN,
    INITIAL_ARCHIVE_REWARD_MAX, INITIAL_ARCHIVE_REWARD_MIN, STORAGE_REWARD_MAX,
    STORAGE_REWARD_MIN,
};
use archivechain_core::error::ArchiveChainError;
use archivechain_safemath::{calculate_reward_safely, Amount};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const HUNDRED_MIB: f64 = 100.0 * 1024.0 * 1024.0;

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Content-type multiplier applied to the initial archive reward.
fn content_type_multiplier(content_type: &str) -> f64 {
    match content_type {
        "text/html" => 1.0,
        "application/pdf" => 1.2,
        ct if ct.starts_with("video/") => 0.8,
        ct if ct.starts_with("image/") => 0.9,
        "application/json" => 1.1,
        _ => 1.0,
    }
}

/// `min + (max - min) · clamp(size/100MiB, 0, 1)`, scaled by rarity and
/// content-type multipliers.
pub fn calculate_archive_reward(
    size_bytes: u64,
    rarity_score: f64,
    content_type: &str,
) -> Result<Amount, ArchiveChainError> {
    let size_factor = clamp01(size_bytes as f64 / HUNDRED_MIB);
    let base = Amount::from_arc(INITIAL_ARCHIVE_REWARD_MIN).to_f64()
        + (Amount::from_arc(INITIAL_ARCHIVE_REWARD_MAX).to_f64()
            - Amount::from_arc(INITIAL_ARCHIVE_REWARD_MIN).to_f64())
            * size_factor;
    let rarity_multiplier = rarity_score.clamp(0.1, 2.0);
    let content_multiplier = content_type_multiplier(content_type);
    calculate_reward_safely(
        Amount::from_micro((base * 1_000_000.0).round() as u128),
        rarity_multiplier * content_multiplier,
        None,
    )
}

/// Per-GiB-month rate interpolated from `[10,50] ARC`, times size-in-GiB
/// times months held.
pub fn calculate_storage_reward(
    storage_days: i64,
    size_bytes: u64,
) -> Result<Amount, ArchiveChainError> {
    let months = storage_days as f64 / 30.0;
    let size_gib = size_bytes as f64 / BYTES_PER_GIB;
    let size_factor = clamp01(size_gib / 100.0);
    let rate_per_gib_month = Amount::from_arc(STORAGE_REWARD_MIN).to_f64()
        + (Amount::from_arc(STORAGE_REWARD_MAX).to_f64()
            - Amount::from_arc(STORAGE_REWARD_MIN).to_f64())
            * size_factor;
    let base = rate_per_gib_month * size_gib;
    calculate_reward_safely(
        Amount::from_micro((base * 1_000_000.0).max(0.0).round() as u128),
        months.max(0.0),
        None,
    )
}

/// Per-GiB-served rate interpolated from `[1,5] ARC`.
pub fn calculate_bandwidth_reward(bytes_served: u64) -> Result<Amount, ArchiveChainError> {
    let gib_served = bytes_served as f64 / BYTES_PER_GIB;
    let gib_factor = clamp01(gib_served / 1000.0);
    let rate_per_gib = Amount::from_arc(BANDWIDTH_REWARD_MIN).to_f64()
        + (Amount::from_arc(BANDWIDTH_REWARD_MAX).to_f64()
            - Amount::from_arc(BANDWIDTH_REWARD_MIN).to_f64())
            * gib_factor;
    calculate_reward_safely(
        Amount::from_micro((rate_per_gib * 1_000_000.0).round() as u128),
        gib_served,
        None,
    )
}

/// `25 + rarity · 75 ARC`.
pub fn calculate_discovery_reward(rarity_score: f64) -> Result<Amount, ArchiveChainError> {
    let base = Amount::from_arc(DISCOVERY_REWARD_BASE);
    calculate_reward_safely(Amount::from_arc(DISCOVERY_REWARD_SPAN), rarity_score, None)
        .and_then(|scaled| archivechain_safemath::safe_add(base, scaled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_reward_scales_with_size_and_rarity() {
        let small = calculate_archive_reward(0, 1.0, "text/html").unwrap();
        let large = calculate_archive_reward(100 * 1024 * 1024, 1.0, "text/html").unwrap();
        assert!(large > small);
        assert_eq!(small, Amount::from_arc(100));
        assert_eq!(large, Amount::from_arc(500));
    }

    #[test]
    fn content_type_multiplier_changes_reward() {
        let html = calculate_archive_reward(0, 1.0, "text/html").unwrap();
        let pdf = calculate_archive_reward(0, 1.0, "application/pdf").unwrap();
        assert!(pdf > html);
    }

    #[test]
    fn discovery_reward_matches_formula() {
        let r = calculate_discovery_reward(0.5).unwrap();
        assert_eq!(r, Amount::parse_arc_str("62.5").unwrap()); // 25 + 0.5*75
    }
}
