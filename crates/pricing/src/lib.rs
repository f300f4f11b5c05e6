pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod numeric;

pub use config::{
    ConfigError, EngineConfig, LoadOptions, PackageSettings, PricingConfig, RoundingMode,
};
pub use domain::catalog::{BillingType, Catalog, CatalogItem, CatalogItemId, UtilityType};
pub use domain::package::{Package, PackageItem};
pub use domain::quote::{QuoteFinancials, QuoteId};
pub use domain::terms::{
    prefer_snapshot, AdvanceType, CommercialCondition, ConditionSnapshot, ResolvedTerms,
};
pub use engine::billing::{effective_quantity, line_subtotal};
pub use engine::package::{
    resolve_package_price, MarginUnitPricer, PackagePriceRequest, PackagePriceResolution,
    PackagePriceSource, UnitPricer,
};
pub use engine::rounding::{
    round_auto, round_price, round_to_charm_ending, round_to_hundred, round_to_thousand,
    RoundingStrategy,
};
pub use engine::totals::{
    calculate_quote_totals, calculate_quote_totals_with_trace, CalculationTrace, QuoteTotals,
    QuoteTotalsRequest, TotalSource, TraceStep,
};
pub use engine::validate::{
    validate_package_inputs, validate_quote_inputs, InputViolation, ValidationResult,
};
pub use engine::{price_package_quote, PackageQuoteOutcome, PackageQuoteRequest};
pub use errors::NumericError;
pub use numeric::{
    decimal_from_f64, decimal_from_json, optional_decimal_from_json, or_zero, CoercionPolicy,
};
