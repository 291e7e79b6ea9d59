//! Fixed-point decimal arithmetic for ARC token amounts.
//!
//! Values are stored as `u128` "micro-ARC" (1 ARC = 1_000_000 micro-ARC,
//! matching the protocol's 6 fractional digits) rather than an
//! arbitrary-precision decimal type. This keeps every SafeMath bound a plain
//! integer comparison and makes overflow/underflow checks exact.

use std::fmt;
use std::str::FromStr;

use archivechain_core::constants::{
    DECIMAL_PLACES, MAX_REWARD_AMOUNT_ARC, MAX_SINGLE_AMOUNT_ARC, MAX_TOKEN_SUPPLY_ARC,
    MICRO_PER_ARC, MIN_AMOUNT_MICRO,
};
use archivechain_core::error::ArchiveChainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A non-negative ARC amount, represented internally as micro-ARC (10⁻⁶ ARC).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Construct directly from a micro-ARC count. Does not enforce bounds —
    /// use `validate_amount` before committing a value derived this way to
    /// state that the protocol treats as caller-supplied.
    pub const fn from_micro(micro: u128) -> Self {
        Amount(micro)
    }

    /// Construct from a whole ARC count (no fractional part).
    pub const fn from_arc(arc: u128) -> Self {
        Amount(arc * MICRO_PER_ARC)
    }

    pub const fn as_micro(&self) -> u128 {
        self.0
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / MICRO_PER_ARC as f64
    }

    /// Parse a decimal ARC string (e.g. `"123.45"`), rounding down (truncating)
    /// to `DECIMAL_PLACES` fractional digits — matches the protocol's
    /// banker-round-down normalization.
    pub fn parse_arc_str(s: &str) -> Result<Self, ArchiveChainError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ArchiveChainError::InvalidAmount("empty amount string".into()));
        }
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        let int_val: u128 = int_part
            .parse()
            .map_err(|_| ArchiveChainError::InvalidAmount(format!("not a decimal: {s}")))?;
        let mut frac_digits = frac_part.to_string();
        if frac_digits.len() > DECIMAL_PLACES as usize {
            frac_digits.truncate(DECIMAL_PLACES as usize); // round down
        }
        while frac_digits.len() < DECIMAL_PLACES as usize {
            frac_digits.push('0');
        }
        let frac_val: u128 = if frac_digits.is_empty() {
            0
        } else {
            frac_digits
                .parse()
                .map_err(|_| ArchiveChainError::InvalidAmount(format!("not a decimal: {s}")))?
        };
        let micro = int_val
            .checked_mul(MICRO_PER_ARC)
            .and_then(|v| v.checked_add(frac_val))
            .ok_or_else(|| ArchiveChainError::Overflow(format!("amount too large: {s}")))?;
        Ok(Amount(micro))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int_part = self.0 / MICRO_PER_ARC;
        let frac_part = self.0 % MICRO_PER_ARC;
        if frac_part == 0 {
            write!(f, "{int_part}")
        } else {
            let frac_str = format!("{:06}", frac_part);
            let trimmed = frac_str.trim_end_matches('0');
            write!(f, "{int_part}.{trimmed}")
        }
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({self})")
    }
}

impl FromStr for Amount {
    type Err = ArchiveChainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse_arc_str(s)
    }
}

// Persistence format (spec.md §6): all decimal fields are strings.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Amount::parse_arc_str(&s).map_err(serde::de::Error::custom)
    }
}

// ── Bounds ───────────────────────────────────────────────────────────────────

/// Reject amounts outside the single-operation bound. Does not reject zero —
/// callers that require a strictly positive amount check that separately.
pub fn validate_amount(amount: Amount) -> Result<(), ArchiveChainError> {
    let max = Amount::from_arc(MAX_SINGLE_AMOUNT_ARC);
    if amount > max {
        return Err(ArchiveChainError::InvalidAmount(format!(
            "amount {amount} exceeds MAX_SINGLE_AMOUNT ({max})"
        )));
    }
    Ok(())
}

/// Total supply ceiling check, used after every mint.
pub fn validate_supply_limits(total_minted: Amount) -> Result<(), ArchiveChainError> {
    let max = Amount::from_arc(MAX_TOKEN_SUPPLY_ARC);
    if total_minted > max {
        return Err(ArchiveChainError::Overflow(format!(
            "total minted {total_minted} exceeds MAX_TOKEN_SUPPLY ({max})"
        )));
    }
    Ok(())
}

// ── Arithmetic ───────────────────────────────────────────────────────────────

pub fn safe_add(a: Amount, b: Amount) -> Result<Amount, ArchiveChainError> {
    a.0.checked_add(b.0)
        .map(Amount)
        .ok_or_else(|| ArchiveChainError::Overflow(format!("{a} + {b}")))
}

pub fn safe_subtract(a: Amount, b: Amount) -> Result<Amount, ArchiveChainError> {
    a.0.checked_sub(b.0)
        .map(Amount)
        .ok_or_else(|| ArchiveChainError::Underflow(format!("{a} - {b}")))
}

/// Multiply an amount by a non-negative integer scalar (e.g. "months held").
pub fn safe_multiply(a: Amount, scalar: u128) -> Result<Amount, ArchiveChainError> {
    a.0.checked_mul(scalar)
        .map(Amount)
        .ok_or_else(|| ArchiveChainError::Overflow(format!("{a} * {scalar}")))
}

pub fn safe_divide(a: Amount, divisor: u128) -> Result<Amount, ArchiveChainError> {
    if divisor == 0 {
        return Err(ArchiveChainError::DivisionByZero);
    }
    Ok(Amount(a.0 / divisor))
}

/// `amount * pct / 100`, truncating. `pct` is a whole-number percentage (0..=100).
pub fn safe_percentage(amount: Amount, pct: u128) -> Result<Amount, ArchiveChainError> {
    let scaled = amount
        .0
        .checked_mul(pct)
        .ok_or_else(|| ArchiveChainError::Overflow(format!("{amount} * {pct}%")))?;
    Ok(Amount(scaled / 100))
}

/// `base * multiplier`, clamped by `max_reward` (if given) and by the global
/// `MAX_REWARD_AMOUNT` bound. `multiplier` is a floating-point factor — reward
/// formulas in §4.4 combine several such factors before this final scaling.
pub fn calculate_reward_safely(
    base: Amount,
    multiplier: f64,
    max_reward: Option<Amount>,
) -> Result<Amount, ArchiveChainError> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(ArchiveChainError::InvalidAmount(format!(
            "invalid reward multiplier: {multiplier}"
        )));
    }
    let scaled_micro = (base.0 as f64) * multiplier;
    if !scaled_micro.is_finite() || scaled_micro < 0.0 {
        return Err(ArchiveChainError::Overflow("reward computation overflowed".into()));
    }
    let mut reward = Amount(scaled_micro.round() as u128);
    let hard_cap = Amount::from_arc(MAX_REWARD_AMOUNT_ARC);
    if reward > hard_cap {
        reward = hard_cap;
    }
    if let Some(cap) = max_reward {
        if reward > cap {
            reward = cap;
        }
    }
    Ok(reward)
}

/// Direction of a balance mutation, used by `validate_balance_operation`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceOp {
    Add,
    Subtract,
}

/// Precondition check run before any balance mutation commits: computes and
/// returns the new balance, or an error, without mutating anything itself.
pub fn validate_balance_operation(
    current: Amount,
    operation_amount: Amount,
    op: BalanceOp,
) -> Result<Amount, ArchiveChainError> {
    validate_amount(operation_amount)?;
    match op {
        BalanceOp::Add => safe_add(current, operation_amount),
        BalanceOp::Subtract => safe_subtract(current, operation_amount),
    }
}

pub fn sum_amounts_safely(amounts: &[Amount]) -> Result<Amount, ArchiveChainError> {
    amounts.iter().try_fold(Amount::ZERO, |acc, &a| safe_add(acc, a))
}

/// Minimum representable, nonzero amount (0.000001 ARC).
pub fn min_amount() -> Amount {
    Amount::from_micro(MIN_AMOUNT_MICRO)
}
