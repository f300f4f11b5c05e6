pub mod billing;
pub mod package;
pub mod rounding;
pub mod totals;
pub mod validate;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, RoundingMode};
use crate::domain::catalog::Catalog;
use crate::domain::package::{Package, PackageItem};
use crate::domain::quote::{QuoteFinancials, QuoteId};
use crate::domain::terms::{CommercialCondition, ConditionSnapshot};

use self::package::{resolve_package_price, PackagePriceRequest, PackagePriceResolution, UnitPricer};
use self::totals::{calculate_quote_totals, QuoteTotals, QuoteTotalsRequest};

/// Everything needed to price a package-backed quote end to end.
#[derive(Clone, Debug)]
pub struct PackageQuoteRequest<'a> {
    pub quote_id: Option<&'a QuoteId>,
    pub package: &'a Package,
    pub items: &'a [PackageItem],
    pub catalog: &'a Catalog,
    pub event_duration_hours: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub negotiated_original: Option<Decimal>,
    pub negotiated_custom: Option<Decimal>,
    pub snapshot: Option<&'a ConditionSnapshot>,
    pub live: Option<&'a CommercialCondition>,
    pub config: &'a EngineConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageQuoteOutcome {
    pub package: PackagePriceResolution,
    pub totals: QuoteTotals,
}

/// Prices a package and feeds the resolved price into the totals engine in
/// one call, so host call sites cannot wire the two stages together
/// inconsistently. Charm rounding on the totals pass follows the package
/// settings' rounding mode (only package-backed quotes round).
pub fn price_package_quote(
    request: &PackageQuoteRequest<'_>,
    pricer: &dyn UnitPricer,
) -> PackageQuoteOutcome {
    let resolution = resolve_package_price(
        &PackagePriceRequest {
            package: request.package,
            items: request.items,
            catalog: request.catalog,
            event_duration_hours: request.event_duration_hours,
            settings: &request.config.package,
            config: &request.config.pricing,
        },
        pricer,
    );

    let quote = QuoteFinancials {
        price: resolution.final_price,
        discount: request.discount,
        negotiated_original: request.negotiated_original,
        negotiated_custom: request.negotiated_custom,
    };
    let totals = calculate_quote_totals(&QuoteTotalsRequest {
        quote_id: request.quote_id,
        quote: &quote,
        snapshot: request.snapshot,
        live: request.live,
        apply_charm_rounding: matches!(request.config.package.rounding, RoundingMode::Charm),
    });

    PackageQuoteOutcome { package: resolution, totals }
}
