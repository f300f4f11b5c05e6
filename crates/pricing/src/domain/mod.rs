pub mod catalog;
pub mod package;
pub mod quote;
pub mod terms;

pub use catalog::{BillingType, Catalog, CatalogItem, CatalogItemId, UtilityType};
pub use package::{Package, PackageItem};
pub use quote::{QuoteFinancials, QuoteId};
pub use terms::{
    prefer_snapshot, AdvanceType, CommercialCondition, ConditionSnapshot, ResolvedTerms,
};
