use rust_decimal::Decimal;

use crate::domain::catalog::BillingType;

/// Quantity actually billed once the event duration is known. Hour items
/// scale with a positive duration; everything else bills as declared.
pub fn effective_quantity(
    billing_type: BillingType,
    quantity: Decimal,
    duration_hours: Option<Decimal>,
) -> Decimal {
    match (billing_type, duration_hours) {
        (BillingType::Hour, Some(hours)) if hours > Decimal::ZERO => quantity * hours,
        _ => quantity,
    }
}

pub fn line_subtotal(
    unit_price: Decimal,
    billing_type: BillingType,
    quantity: Decimal,
    duration_hours: Option<Decimal>,
) -> Decimal {
    unit_price * effective_quantity(billing_type, quantity, duration_hours)
}
