//! Psychological price rounding.
//!
//! Published price lists use "charm" endings (549, 1099, 20199). An amount is
//! pulled to a nearby ending from a fixed offset table, with two ranges that
//! were tuned separately against the studio's historical price lists. The
//! sub-1000 rule refuses to round downward; the rule for 1000 and above picks
//! the nearest ending in either direction. Both behaviors are load-bearing
//! for already published prices and must not be unified.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Charm endings inside a decade, applied below 1000.
const DECADE_CHARM_OFFSETS: [u32; 6] = [9, 19, 29, 39, 69, 99];

/// Charm endings relative to a hundred block, applied from 1000 upward.
const HUNDRED_CHARM_OFFSETS: [u32; 5] = [199, 299, 399, 699, 999];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingStrategy {
    Charm,
    Hundred,
    Thousand,
    Auto,
}

impl std::str::FromStr for RoundingStrategy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "charm" => Ok(Self::Charm),
            "hundred" => Ok(Self::Hundred),
            "thousand" => Ok(Self::Thousand),
            "auto" => Ok(Self::Auto),
            other => Err(ConfigError::Validation(format!(
                "unsupported rounding strategy `{other}` (expected charm|hundred|thousand|auto)"
            ))),
        }
    }
}

/// Applies `strategy` to `amount`. Non-positive amounts pass through
/// untouched for every strategy.
pub fn round_price(amount: Decimal, strategy: RoundingStrategy) -> Decimal {
    if amount <= Decimal::ZERO {
        return amount;
    }

    match strategy {
        RoundingStrategy::Charm => round_to_charm_ending(amount),
        RoundingStrategy::Hundred => round_to_hundred(amount),
        RoundingStrategy::Thousand => round_to_thousand(amount),
        RoundingStrategy::Auto => round_auto(amount),
    }
}

pub fn round_to_hundred(amount: Decimal) -> Decimal {
    (amount / Decimal::ONE_HUNDRED).ceil() * Decimal::ONE_HUNDRED
}

pub fn round_to_thousand(amount: Decimal) -> Decimal {
    (amount / Decimal::ONE_THOUSAND).ceil() * Decimal::ONE_THOUSAND
}

/// Strategy selection by amount: charm below 50 000, hundreds below 100 000,
/// thousands above.
pub fn round_auto(amount: Decimal) -> Decimal {
    if amount < Decimal::from(50_000) {
        round_to_charm_ending(amount)
    } else if amount < Decimal::from(100_000) {
        round_to_hundred(amount)
    } else {
        round_to_thousand(amount)
    }
}

pub fn round_to_charm_ending(amount: Decimal) -> Decimal {
    if amount < Decimal::ONE_THOUSAND {
        charm_below_thousand(amount)
    } else {
        charm_from_thousand(amount)
    }
}

fn charm_below_thousand(amount: Decimal) -> Decimal {
    let decade = (amount / Decimal::TEN).floor() * Decimal::TEN;
    let next_decade = decade + Decimal::TEN;

    let mut nearest = decade + Decimal::from(DECADE_CHARM_OFFSETS[0]);
    for base in [decade, next_decade] {
        for offset in DECADE_CHARM_OFFSETS {
            let candidate = base + Decimal::from(offset);
            if (amount - candidate).abs() < (amount - nearest).abs() {
                nearest = candidate;
            }
        }
    }

    // never round a sub-1000 price down; climb into the next decade instead
    if nearest < amount {
        for offset in DECADE_CHARM_OFFSETS {
            let candidate = next_decade + Decimal::from(offset);
            if candidate >= amount {
                return candidate;
            }
        }
    }

    nearest
}

fn charm_from_thousand(amount: Decimal) -> Decimal {
    let block = (amount / Decimal::ONE_HUNDRED).floor() * Decimal::ONE_HUNDRED;

    let mut nearest: Option<Decimal> = None;
    for base in [block - Decimal::ONE_HUNDRED, block, block + Decimal::ONE_HUNDRED] {
        if base < Decimal::ZERO {
            continue;
        }
        for offset in HUNDRED_CHARM_OFFSETS {
            let candidate = base + Decimal::from(offset);
            let closer = match nearest {
                Some(current) => (amount - candidate).abs() < (amount - current).abs(),
                None => true,
            };
            if closer {
                nearest = Some(candidate);
            }
        }
    }

    nearest.unwrap_or(amount)
}
