use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{PackageSettings, PricingConfig, RoundingMode};
use crate::domain::catalog::{Catalog, UtilityType};
use crate::domain::package::{Package, PackageItem};
use crate::engine::billing::line_subtotal;
use crate::engine::rounding::{round_price, RoundingStrategy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackagePriceSource {
    Personalized,
    Recalculated,
    Base,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagePriceResolution {
    pub final_price: Decimal,
    pub base_price: Decimal,
    pub recalculated_price: Decimal,
    pub hours_match: bool,
    pub price_source: PackagePriceSource,
}

/// Derives an item's unit price from cost and expense when the item carries
/// no personalized price. Consumed by the package engine as a seam so hosts
/// with their own derivation can plug it in.
pub trait UnitPricer: Send + Sync {
    fn unit_price(
        &self,
        cost: Decimal,
        expense: Decimal,
        utility_type: UtilityType,
        config: &PricingConfig,
    ) -> Decimal;
}

/// Standard derivation: `(cost + expense) / (1 - margin)`, margin chosen by
/// the item's utility type. A margin at or above 1 degrades to cost plus
/// expense instead of dividing by zero.
#[derive(Default)]
pub struct MarginUnitPricer;

impl UnitPricer for MarginUnitPricer {
    fn unit_price(
        &self,
        cost: Decimal,
        expense: Decimal,
        utility_type: UtilityType,
        config: &PricingConfig,
    ) -> Decimal {
        let margin = match utility_type {
            UtilityType::Service => config.service_margin,
            UtilityType::Product => config.product_margin,
        };
        let base = cost + expense;
        let divisor = Decimal::ONE - margin;
        if divisor <= Decimal::ZERO {
            return base;
        }
        base / divisor
    }
}

#[derive(Clone, Debug)]
pub struct PackagePriceRequest<'a> {
    pub package: &'a Package,
    pub items: &'a [PackageItem],
    pub catalog: &'a Catalog,
    pub event_duration_hours: Option<Decimal>,
    pub settings: &'a PackageSettings,
    pub config: &'a PricingConfig,
}

/// Resolves the price to charge for a package: the studio's personalized
/// price when it can be trusted, otherwise a price recomputed item by item
/// from the catalog. The first matching branch wins:
///
/// 1. recalculation disabled and a personalized price exists: personalized
/// 2. personalized price authored for exactly the event's duration: personalized,
///    taken as final and never rounded
/// 3. personalized price authored for a different known duration: recalculated
///    (personalized backstops a non-positive recalculation)
/// 4. event duration unknown: personalized, never rounded
/// 5. positive recalculated price: recalculated
/// 6. nothing usable: the stored base price, never rounded
pub fn resolve_package_price(
    request: &PackagePriceRequest<'_>,
    pricer: &dyn UnitPricer,
) -> PackagePriceResolution {
    let base_price = request.package.personalized_price;
    let base_hours = normalize_hours(request.package.base_hours);
    let event_hours = normalize_hours(request.event_duration_hours);

    let billing_hours = event_hours.or(base_hours);
    let recalculated_price: Decimal = request
        .items
        .iter()
        .map(|item| {
            let unit_price = item_unit_price(item, request.catalog, request.config, pricer);
            let billing_type = request.catalog.billing_type_for(&item.item_id);
            line_subtotal(unit_price, billing_type, item.quantity, billing_hours)
        })
        .sum();

    let hours_match =
        matches!((base_hours, event_hours), (Some(base), Some(event)) if base == event);
    let has_personalized = base_price > Decimal::ZERO;
    let charm = matches!(request.settings.rounding, RoundingMode::Charm);

    let (final_price, price_source, apply_rounding) =
        if !request.settings.allow_recalc && has_personalized {
            (base_price, PackagePriceSource::Personalized, charm)
        } else if has_personalized && hours_match {
            (base_price, PackagePriceSource::Personalized, false)
        } else if has_personalized && event_hours.is_some() {
            if recalculated_price > Decimal::ZERO {
                (recalculated_price, PackagePriceSource::Recalculated, charm)
            } else {
                (base_price, PackagePriceSource::Personalized, charm)
            }
        } else if has_personalized {
            (base_price, PackagePriceSource::Personalized, false)
        } else if recalculated_price > Decimal::ZERO {
            (recalculated_price, PackagePriceSource::Recalculated, charm)
        } else {
            (base_price, PackagePriceSource::Base, false)
        };

    let final_price = if apply_rounding {
        round_price(final_price, RoundingStrategy::Charm)
    } else {
        final_price
    };

    PackagePriceResolution {
        final_price,
        base_price,
        recalculated_price,
        hours_match,
        price_source,
    }
}

/// Zero or negative durations mean the value was never recorded.
fn normalize_hours(hours: Option<Decimal>) -> Option<Decimal> {
    hours.filter(|value| *value > Decimal::ZERO)
}

fn item_unit_price(
    item: &PackageItem,
    catalog: &Catalog,
    config: &PricingConfig,
    pricer: &dyn UnitPricer,
) -> Decimal {
    if let Some(price) = item.personalized_item_price {
        if price > Decimal::ZERO {
            return price;
        }
    }

    match catalog.find(&item.item_id) {
        Some(entry) => pricer.unit_price(entry.cost, entry.expense, entry.utility_type, config),
        None => Decimal::ZERO,
    }
}
