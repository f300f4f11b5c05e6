use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvanceType {
    Percentage,
    FixedAmount,
}

/// The live, mutable commercial-condition record attached to a quote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialCondition {
    pub name: String,
    pub discount_percentage: Option<Decimal>,
    pub advance_percentage: Option<Decimal>,
    pub advance_type: Option<AdvanceType>,
    pub advance_amount: Option<Decimal>,
}

/// Immutable copy of a condition's terms captured at quote approval.
///
/// The live record may later change or be deleted; approved quotes keep
/// billing against the snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionSnapshot {
    pub discount_percentage: Option<Decimal>,
    pub advance_percentage: Option<Decimal>,
    pub advance_type: Option<AdvanceType>,
    pub advance_amount: Option<Decimal>,
    pub captured_at: DateTime<Utc>,
}

/// Snapshot-first field resolution: the snapshot value wins whenever it is
/// present, the live value fills gaps, absence stays absent.
pub fn prefer_snapshot<T>(snapshot: Option<T>, live: Option<T>) -> Option<T> {
    snapshot.or(live)
}

/// Condition terms after snapshot-first resolution, ready for the totals
/// engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTerms {
    pub discount_percentage: Option<Decimal>,
    pub advance_percentage: Option<Decimal>,
    pub advance_type: Option<AdvanceType>,
    pub advance_amount: Option<Decimal>,
}

impl ResolvedTerms {
    pub fn resolve(
        snapshot: Option<&ConditionSnapshot>,
        live: Option<&CommercialCondition>,
    ) -> Self {
        Self {
            discount_percentage: prefer_snapshot(
                snapshot.and_then(|terms| terms.discount_percentage),
                live.and_then(|terms| terms.discount_percentage),
            ),
            advance_percentage: prefer_snapshot(
                snapshot.and_then(|terms| terms.advance_percentage),
                live.and_then(|terms| terms.advance_percentage),
            ),
            advance_type: prefer_snapshot(
                snapshot.and_then(|terms| terms.advance_type),
                live.and_then(|terms| terms.advance_type),
            ),
            advance_amount: prefer_snapshot(
                snapshot.and_then(|terms| terms.advance_amount),
                live.and_then(|terms| terms.advance_amount),
            ),
        }
    }
}
