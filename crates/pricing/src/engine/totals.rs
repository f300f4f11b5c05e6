//! The quote totals engine, the single authority on what a client pays.
//!
//! Every host surface that shows money (contract renderer, commercial
//! dashboards, financial summaries) must route through this module; the
//! parity contract test guards it against drift. The resolution ladder is
//! legally binding: a negotiated price always beats a percentage discount,
//! even when both are present on the row.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::quote::{QuoteFinancials, QuoteId};
use crate::domain::terms::{AdvanceType, CommercialCondition, ConditionSnapshot, ResolvedTerms};
use crate::engine::rounding::{round_price, RoundingStrategy};
use crate::numeric::or_zero;

/// Which branch of the resolution ladder produced the payable total.
/// Serialized names are the host's historical source tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalSource {
    Negociado,
    DescuentoPorcentaje,
    DescuentoMonto,
    SinDescuento,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

/// Labeled record of each step the engine took, for dashboards and support.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationTrace {
    pub quote_id: Option<QuoteId>,
    pub steps: Vec<TraceStep>,
}

#[derive(Clone, Debug)]
pub struct QuoteTotalsRequest<'a> {
    pub quote_id: Option<&'a QuoteId>,
    pub quote: &'a QuoteFinancials,
    pub snapshot: Option<&'a ConditionSnapshot>,
    pub live: Option<&'a CommercialCondition>,
    pub apply_charm_rounding: bool,
}

/// The authoritative payment tuple. Wire field names match what the host's
/// consumers already render (`totalAPagar`, `precioBaseReal`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub total_a_pagar: Decimal,
    pub precio_base: Decimal,
    pub precio_base_real: Decimal,
    pub descuento_aplicado: Decimal,
    pub descuento_porcentaje: Option<Decimal>,
    pub source: TotalSource,
    pub anticipo: Decimal,
    pub diferido: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio_original_para_comparativa: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ahorro_total: Option<Decimal>,
}

pub fn calculate_quote_totals(request: &QuoteTotalsRequest<'_>) -> QuoteTotals {
    resolve(request, &mut None)
}

pub fn calculate_quote_totals_with_trace(
    request: &QuoteTotalsRequest<'_>,
) -> (QuoteTotals, CalculationTrace) {
    let mut steps = Some(Vec::new());
    let totals = resolve(request, &mut steps);
    let trace = CalculationTrace {
        quote_id: request.quote_id.cloned(),
        steps: steps.unwrap_or_default(),
    };
    (totals, trace)
}

/// Single implementation behind both entry points so they can never diverge;
/// the plain path skips trace allocation entirely.
fn resolve(request: &QuoteTotalsRequest<'_>, steps: &mut Option<Vec<TraceStep>>) -> QuoteTotals {
    let price = request.quote.price;
    let discount = or_zero(request.quote.discount);

    // a positive monetary discount is already baked into `price`, so the
    // pre-discount base is recovered by adding it back
    let precio_base_real =
        if discount > Decimal::ZERO { price + discount } else { price };
    push_step(steps, "base", "pre-discount base reconstructed from price + discount", precio_base_real);

    let terms = ResolvedTerms::resolve(request.snapshot, request.live);
    let discount_percentage = terms.discount_percentage.filter(|pct| *pct > Decimal::ZERO);

    let negotiated_custom =
        request.quote.negotiated_custom.filter(|amount| *amount > Decimal::ZERO);

    let mut precio_original_para_comparativa = None;
    let mut ahorro_total = None;

    let (mut total_a_pagar, descuento_aplicado, source) = if let Some(custom) = negotiated_custom {
        // negotiation wins over any percentage discount; the frozen custom
        // price is the binding figure
        let reference = request.quote.negotiated_original.unwrap_or(precio_base_real);
        precio_original_para_comparativa = Some(reference);
        ahorro_total = Some(reference - custom);
        push_step(steps, "negotiation", "negotiated custom price taken as total", custom);
        (custom, Decimal::ZERO, TotalSource::Negociado)
    } else if let Some(pct) = discount_percentage {
        let applied = precio_base_real * pct / Decimal::ONE_HUNDRED;
        push_step(steps, "percentage_discount", "condition percentage applied to base", applied);
        (precio_base_real - applied, applied, TotalSource::DescuentoPorcentaje)
    } else if discount > Decimal::ZERO {
        push_step(steps, "monetary_discount", "stored price already net of discount", discount);
        (price, discount, TotalSource::DescuentoMonto)
    } else {
        push_step(steps, "no_discount", "stored price taken as-is", price);
        (price, Decimal::ZERO, TotalSource::SinDescuento)
    };

    if request.apply_charm_rounding {
        total_a_pagar = round_price(total_a_pagar, RoundingStrategy::Charm);
        push_step(steps, "rounding", "charm rounding applied to total", total_a_pagar);
    }

    let anticipo = match terms.advance_type {
        Some(AdvanceType::Percentage) => match terms.advance_percentage {
            Some(pct) if pct > Decimal::ZERO => total_a_pagar * pct / Decimal::ONE_HUNDRED,
            _ => Decimal::ZERO,
        },
        Some(AdvanceType::FixedAmount) => match terms.advance_amount {
            Some(amount) if amount > Decimal::ZERO => amount,
            _ => Decimal::ZERO,
        },
        None => Decimal::ZERO,
    };
    // diferido is derived, never computed independently, so the split always
    // sums back to the total exactly
    let diferido = total_a_pagar - anticipo;
    push_step(steps, "advance", "anticipo resolved from condition terms", anticipo);
    push_step(steps, "deferred", "diferido = total - anticipo", diferido);

    QuoteTotals {
        total_a_pagar,
        precio_base: price,
        precio_base_real,
        descuento_aplicado,
        // display value: echoes the resolved percentage even when the
        // negotiation branch suppressed its application
        descuento_porcentaje: terms.discount_percentage,
        source,
        anticipo,
        diferido,
        precio_original_para_comparativa,
        ahorro_total,
    }
}

fn push_step(steps: &mut Option<Vec<TraceStep>>, stage: &str, detail: &str, amount: Decimal) {
    if let Some(steps) = steps {
        steps.push(TraceStep {
            stage: stage.to_owned(),
            detail: detail.to_owned(),
            amount,
        });
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::{
        calculate_quote_totals, calculate_quote_totals_with_trace, QuoteTotalsRequest, TotalSource,
    };
    use crate::domain::quote::{QuoteFinancials, QuoteId};
    use crate::domain::terms::{AdvanceType, CommercialCondition, ConditionSnapshot};

    fn snapshot(
        discount_pct: Option<i64>,
        advance_pct: Option<i64>,
        advance_type: Option<AdvanceType>,
        advance_amount: Option<i64>,
    ) -> ConditionSnapshot {
        ConditionSnapshot {
            discount_percentage: discount_pct.map(Decimal::from),
            advance_percentage: advance_pct.map(Decimal::from),
            advance_type,
            advance_amount: advance_amount.map(Decimal::from),
            captured_at: Utc::now(),
        }
    }

    fn quote(
        price: i64,
        discount: Option<i64>,
        negotiated_original: Option<i64>,
        negotiated_custom: Option<i64>,
    ) -> QuoteFinancials {
        QuoteFinancials {
            price: Decimal::from(price),
            discount: discount.map(Decimal::from),
            negotiated_original: negotiated_original.map(Decimal::from),
            negotiated_custom: negotiated_custom.map(Decimal::from),
        }
    }

    fn request<'a>(
        quote: &'a QuoteFinancials,
        snapshot: Option<&'a ConditionSnapshot>,
    ) -> QuoteTotalsRequest<'a> {
        QuoteTotalsRequest {
            quote_id: None,
            quote,
            snapshot,
            live: None,
            apply_charm_rounding: false,
        }
    }

    #[test]
    fn negotiated_quote_resolves_to_the_custom_price() {
        let quote = quote(25_000, None, Some(25_000), Some(22_000));
        let terms = snapshot(Some(10), Some(50), Some(AdvanceType::Percentage), None);
        let totals = calculate_quote_totals(&request(&quote, Some(&terms)));

        assert_eq!(totals.total_a_pagar, Decimal::from(22_000));
        assert_eq!(totals.descuento_aplicado, Decimal::ZERO);
        assert_eq!(totals.source, TotalSource::Negociado);
        assert_eq!(totals.ahorro_total, Some(Decimal::from(3_000)));
        assert_eq!(totals.anticipo, Decimal::from(11_000));
        assert_eq!(totals.diferido, Decimal::from(11_000));
    }

    #[test]
    fn percentage_discount_applies_to_the_reconstructed_base() {
        let quote = quote(20_000, None, None, None);
        let terms = snapshot(Some(15), Some(30), Some(AdvanceType::Percentage), None);
        let totals = calculate_quote_totals(&request(&quote, Some(&terms)));

        assert_eq!(totals.precio_base_real, Decimal::from(20_000));
        assert_eq!(totals.descuento_aplicado, Decimal::from(3_000));
        assert_eq!(totals.total_a_pagar, Decimal::from(17_000));
        assert_eq!(totals.source, TotalSource::DescuentoPorcentaje);
        assert_eq!(totals.anticipo, Decimal::from(5_100));
        assert_eq!(totals.diferido, Decimal::from(11_900));
    }

    #[test]
    fn negotiation_overrides_a_percentage_discount() {
        let quote = quote(30_000, None, Some(30_000), Some(25_000));
        let terms = snapshot(Some(10), Some(20), Some(AdvanceType::Percentage), None);
        let totals = calculate_quote_totals(&request(&quote, Some(&terms)));

        assert_eq!(totals.total_a_pagar, Decimal::from(25_000));
        assert_eq!(totals.descuento_aplicado, Decimal::ZERO);
        assert_eq!(totals.source, TotalSource::Negociado);
        assert_eq!(totals.anticipo, Decimal::from(5_000));
        assert_eq!(totals.diferido, Decimal::from(20_000));
        // the suppressed percentage is still echoed for display
        assert_eq!(totals.descuento_porcentaje, Some(Decimal::from(10)));
    }

    #[test]
    fn monetary_discount_keeps_the_stored_price_and_reports_the_discount() {
        let quote = quote(12_000, Some(2_000), None, None);
        let totals = calculate_quote_totals(&request(&quote, None));

        assert_eq!(totals.total_a_pagar, Decimal::from(12_000));
        assert_eq!(totals.precio_base_real, Decimal::from(14_000));
        assert_eq!(totals.descuento_aplicado, Decimal::from(2_000));
        assert_eq!(totals.source, TotalSource::DescuentoMonto);
        assert_eq!(totals.anticipo, Decimal::ZERO);
        assert_eq!(totals.diferido, Decimal::from(12_000));
    }

    #[test]
    fn no_discount_and_no_conditions_passes_the_price_through() {
        let quote = quote(9_500, None, None, None);
        let totals = calculate_quote_totals(&request(&quote, None));

        assert_eq!(totals.total_a_pagar, Decimal::from(9_500));
        assert_eq!(totals.descuento_aplicado, Decimal::ZERO);
        assert_eq!(totals.source, TotalSource::SinDescuento);
        assert_eq!(totals.diferido, Decimal::from(9_500));
    }

    #[test]
    fn missing_negotiated_original_compares_against_the_base() {
        let quote = quote(25_000, None, None, Some(22_000));
        let totals = calculate_quote_totals(&request(&quote, None));

        assert_eq!(totals.precio_original_para_comparativa, Some(Decimal::from(25_000)));
        assert_eq!(totals.ahorro_total, Some(Decimal::from(3_000)));
    }

    #[test]
    fn non_positive_negotiated_custom_does_not_activate_negotiation() {
        let quote = quote(18_000, None, Some(18_000), Some(0));
        let terms = snapshot(Some(10), None, None, None);
        let totals = calculate_quote_totals(&request(&quote, Some(&terms)));

        assert_eq!(totals.source, TotalSource::DescuentoPorcentaje);
        assert_eq!(totals.total_a_pagar, Decimal::from(16_200));
        assert_eq!(totals.ahorro_total, None);
    }

    #[test]
    fn fixed_advance_amount_is_taken_verbatim() {
        let quote = quote(20_000, None, None, None);
        let terms = snapshot(None, None, Some(AdvanceType::FixedAmount), Some(7_500));
        let totals = calculate_quote_totals(&request(&quote, Some(&terms)));

        assert_eq!(totals.anticipo, Decimal::from(7_500));
        assert_eq!(totals.diferido, Decimal::from(12_500));
    }

    #[test]
    fn fixed_advance_above_the_total_splits_into_a_negative_deferred() {
        let quote = quote(5_000, None, None, None);
        let terms = snapshot(None, None, Some(AdvanceType::FixedAmount), Some(8_000));
        let totals = calculate_quote_totals(&request(&quote, Some(&terms)));

        assert_eq!(totals.anticipo, Decimal::from(8_000));
        assert_eq!(totals.diferido, Decimal::from(-3_000));
        assert_eq!(totals.anticipo + totals.diferido, totals.total_a_pagar);
    }

    #[test]
    fn advance_type_without_its_counterpart_field_yields_no_advance() {
        let quote = quote(20_000, None, None, None);

        let percentage_only = snapshot(None, None, Some(AdvanceType::Percentage), None);
        let totals = calculate_quote_totals(&request(&quote, Some(&percentage_only)));
        assert_eq!(totals.anticipo, Decimal::ZERO);

        let amount_only = snapshot(None, Some(30), Some(AdvanceType::FixedAmount), None);
        let totals = calculate_quote_totals(&request(&quote, Some(&amount_only)));
        assert_eq!(totals.anticipo, Decimal::ZERO);
        assert_eq!(totals.diferido, totals.total_a_pagar);
    }

    #[test]
    fn live_condition_fills_fields_the_snapshot_never_captured() {
        let quote = quote(20_000, None, None, None);
        let captured = snapshot(Some(15), None, None, None);
        let live = CommercialCondition {
            name: "Temporada alta".to_owned(),
            discount_percentage: Some(Decimal::from(50)),
            advance_percentage: Some(Decimal::from(30)),
            advance_type: Some(AdvanceType::Percentage),
            advance_amount: None,
        };

        let totals = calculate_quote_totals(&QuoteTotalsRequest {
            quote_id: None,
            quote: &quote,
            snapshot: Some(&captured),
            live: Some(&live),
            apply_charm_rounding: false,
        });

        // frozen 15% wins over the live 50%; the advance terms were never
        // captured so the live record supplies them
        assert_eq!(totals.descuento_aplicado, Decimal::from(3_000));
        assert_eq!(totals.anticipo, Decimal::from(5_100));
    }

    #[test]
    fn charm_rounding_runs_before_the_advance_split() {
        let quote = quote(20_171, None, None, None);
        let terms = snapshot(None, Some(50), Some(AdvanceType::Percentage), None);
        let totals = calculate_quote_totals(&QuoteTotalsRequest {
            quote_id: None,
            quote: &quote,
            snapshot: Some(&terms),
            live: None,
            apply_charm_rounding: true,
        });

        assert_eq!(totals.total_a_pagar, Decimal::from(20_199));
        assert_eq!(totals.anticipo, Decimal::new(1_009_950, 2));
        assert_eq!(totals.anticipo + totals.diferido, totals.total_a_pagar);
    }

    #[test]
    fn trace_names_the_branch_that_resolved_the_total() {
        let quote = quote(25_000, None, Some(25_000), Some(22_000));
        let id = QuoteId("Q-2026-0042".to_owned());
        let (totals, trace) = calculate_quote_totals_with_trace(&QuoteTotalsRequest {
            quote_id: Some(&id),
            quote: &quote,
            snapshot: None,
            live: None,
            apply_charm_rounding: false,
        });

        assert_eq!(totals.source, TotalSource::Negociado);
        assert_eq!(trace.quote_id, Some(id));
        assert!(trace.steps.iter().any(|step| step.stage == "negotiation"));
        let deferred = trace.steps.last().expect("trace should not be empty");
        assert_eq!(deferred.stage, "deferred");
        assert_eq!(deferred.amount, totals.diferido);
    }

    #[test]
    fn both_entry_points_agree() {
        let quote = quote(20_000, Some(1_500), None, None);
        let terms = snapshot(None, Some(40), Some(AdvanceType::Percentage), None);
        let request = request(&quote, Some(&terms));

        let plain = calculate_quote_totals(&request);
        let (traced, _) = calculate_quote_totals_with_trace(&request);
        assert_eq!(plain, traced);
    }

    #[test]
    fn totals_serialize_with_host_field_names() {
        let negotiated = quote(25_000, None, Some(25_000), Some(22_000));
        let totals = calculate_quote_totals(&request(&negotiated, None));

        let value = serde_json::to_value(&totals).expect("serialize totals");
        assert_eq!(value["source"], "negociado");
        assert!(value.get("totalAPagar").is_some());
        assert!(value.get("precioBaseReal").is_some());
        assert!(value.get("precioOriginalParaComparativa").is_some());
        assert!(value.get("ahorroTotal").is_some());

        // comparative fields are omitted outside the negotiated branch
        let plain = calculate_quote_totals(&request(&quote(10_000, None, None, None), None));
        let value = serde_json::to_value(&plain).expect("serialize totals");
        assert!(value.get("ahorroTotal").is_none());
    }
}
