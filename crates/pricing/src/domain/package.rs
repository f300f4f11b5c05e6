use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::CatalogItemId;

/// A pre-defined service package. `base_hours` is the event duration the
/// personalized price was authored for; zero or negative values mean the
/// duration was never recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub personalized_price: Decimal,
    pub base_hours: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageItem {
    pub item_id: CatalogItemId,
    pub quantity: Decimal,
    pub personalized_item_price: Option<Decimal>,
}
