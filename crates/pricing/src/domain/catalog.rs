use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogItemId(pub String);

/// How a catalog item bills against an event: `Hour` scales with the event
/// duration, `Service` and `Unit` are fixed regardless of duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingType {
    Hour,
    Service,
    Unit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UtilityType {
    Service,
    Product,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub billing_type: BillingType,
    pub cost: Decimal,
    pub expense: Decimal,
    pub utility_type: UtilityType,
}

#[derive(Debug, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn find(&self, item_id: &CatalogItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.id == item_id)
    }

    /// Items missing from the catalog bill as `Service`.
    pub fn billing_type_for(&self, item_id: &CatalogItemId) -> BillingType {
        self.find(item_id).map_or(BillingType::Service, |item| item.billing_type)
    }
}
