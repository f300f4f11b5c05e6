//! Pre-flight validation for callers that must reject corrupt rows.
//!
//! The engines themselves keep the host's lenient semantics (bad numerics
//! degrade to "no discount / no advance"); ingestion paths that need strict
//! behavior run these checks first and refuse to quote on violations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::domain::package::{Package, PackageItem};
use crate::domain::quote::QuoteFinancials;
use crate::domain::terms::{AdvanceType, CommercialCondition, ConditionSnapshot, ResolvedTerms};
use crate::engine::totals::{calculate_quote_totals, QuoteTotalsRequest};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputViolation {
    pub code: String,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<InputViolation>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self { valid: true, violations: Vec::new() }
    }
}

impl ValidationResult {
    fn push(&mut self, code: &str, message: String, suggestion: &str) {
        self.valid = false;
        self.violations.push(InputViolation {
            code: code.to_owned(),
            message,
            suggestion: Some(suggestion.to_owned()),
        });
    }
}

pub fn validate_quote_inputs(
    quote: &QuoteFinancials,
    snapshot: Option<&ConditionSnapshot>,
    live: Option<&CommercialCondition>,
) -> ValidationResult {
    let mut result = ValidationResult::default();

    if quote.price < Decimal::ZERO {
        result.push(
            "NEGATIVE_PRICE",
            format!("Quote price {} is negative", quote.price),
            "Store the absolute amount; discounts belong in the discount field",
        );
    }
    if let Some(discount) = quote.discount {
        if discount < Decimal::ZERO {
            result.push(
                "NEGATIVE_DISCOUNT",
                format!("Monetary discount {discount} is negative"),
                "Use a non-negative amount; zero means no discount",
            );
        }
    }
    if let Some(custom) = quote.negotiated_custom {
        if custom <= Decimal::ZERO {
            result.push(
                "NON_POSITIVE_NEGOTIATED_PRICE",
                format!("Negotiated custom price {custom} is not positive"),
                "Clear the negotiation fields instead of storing a zero price",
            );
        }
    }

    let terms = ResolvedTerms::resolve(snapshot, live);
    if let Some(pct) = terms.discount_percentage {
        if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
            result.push(
                "DISCOUNT_PERCENTAGE_OUT_OF_RANGE",
                format!("Discount percentage {pct} is outside 0..=100"),
                "Store percentages as whole numbers between 0 and 100",
            );
        }
    }
    if let Some(pct) = terms.advance_percentage {
        if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
            result.push(
                "ADVANCE_PERCENTAGE_OUT_OF_RANGE",
                format!("Advance percentage {pct} is outside 0..=100"),
                "Store percentages as whole numbers between 0 and 100",
            );
        }
    }
    if let Some(amount) = terms.advance_amount {
        if amount < Decimal::ZERO {
            result.push(
                "NEGATIVE_ADVANCE_AMOUNT",
                format!("Fixed advance amount {amount} is negative"),
                "Use a non-negative amount; zero means no advance",
            );
        }
    }

    match terms.advance_type {
        Some(AdvanceType::Percentage)
            if !terms.advance_percentage.is_some_and(|pct| pct > Decimal::ZERO) =>
        {
            result.push(
                "ADVANCE_PERCENTAGE_MISSING",
                "Advance type is PERCENTAGE but no positive percentage is set".to_owned(),
                "Set advancePercentage or clear the advance type",
            );
        }
        Some(AdvanceType::FixedAmount)
            if !terms.advance_amount.is_some_and(|amount| amount > Decimal::ZERO) =>
        {
            result.push(
                "ADVANCE_AMOUNT_MISSING",
                "Advance type is FIXED_AMOUNT but no positive amount is set".to_owned(),
                "Set advanceAmount or clear the advance type",
            );
        }
        _ => {}
    }

    // a fixed advance above the payable total splits into a negative
    // deferred balance; flag it here rather than inside the engine
    if matches!(terms.advance_type, Some(AdvanceType::FixedAmount)) {
        if let Some(amount) = terms.advance_amount.filter(|amount| *amount > Decimal::ZERO) {
            let totals = calculate_quote_totals(&QuoteTotalsRequest {
                quote_id: None,
                quote,
                snapshot,
                live,
                apply_charm_rounding: false,
            });
            if amount > totals.total_a_pagar {
                result.push(
                    "ADVANCE_EXCEEDS_TOTAL",
                    format!(
                        "Fixed advance {amount} exceeds the payable total {}",
                        totals.total_a_pagar
                    ),
                    "Reduce the advance amount or switch to a percentage advance",
                );
            }
        }
    }

    result
}

pub fn validate_package_inputs(
    package: &Package,
    items: &[PackageItem],
    config: &PricingConfig,
) -> ValidationResult {
    let mut result = ValidationResult::default();

    if package.personalized_price < Decimal::ZERO {
        result.push(
            "NEGATIVE_PERSONALIZED_PRICE",
            format!("Personalized package price {} is negative", package.personalized_price),
            "Use zero to mean \"no personalized price\"",
        );
    }

    for item in items {
        if item.quantity <= Decimal::ZERO {
            result.push(
                "NON_POSITIVE_QUANTITY",
                format!("Item {} has non-positive quantity {}", item.item_id.0, item.quantity),
                "Use a positive quantity or remove the item from the package",
            );
        }
        if let Some(price) = item.personalized_item_price {
            if price < Decimal::ZERO {
                result.push(
                    "NEGATIVE_ITEM_PRICE",
                    format!("Item {} has negative personalized price {price}", item.item_id.0),
                    "Clear the personalized item price to fall back to the derived price",
                );
            }
        }
    }

    for (field, margin) in [
        ("service_margin", config.service_margin),
        ("product_margin", config.product_margin),
    ] {
        if margin < Decimal::ZERO || margin >= Decimal::ONE {
            result.push(
                "MARGIN_OUT_OF_RANGE",
                format!("Pricing margin {field} = {margin} is outside [0, 1)"),
                "Margins are fractions of the price, not percentages",
            );
        }
    }

    result
}
