use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque quote row identifier, assigned and owned by the host application.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

/// Monetary fields of a quote row as stored by the host application.
///
/// Invariant carried over from the host schema: when `discount` is a positive
/// amount, `price` already has that discount baked in, so `price + discount`
/// recovers the pre-discount base.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFinancials {
    pub price: Decimal,
    pub discount: Option<Decimal>,
    pub negotiated_original: Option<Decimal>,
    pub negotiated_custom: Option<Decimal>,
}

impl QuoteFinancials {
    pub fn new(price: Decimal) -> Self {
        Self { price, discount: None, negotiated_original: None, negotiated_custom: None }
    }
}
