use serde::Serialize;

use crate::currency::{format_foreign, format_local, format_number};
use crate::model::{CurrencyMode, Discount, LineItem};

/// A line item together with its derived amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedLineItem {
    pub item: LineItem,
    /// `quantity * unit_price`
    pub base: f64,
    pub discount_amount: f64,
    /// `base - discount_amount`; negative when the discount exceeds the base.
    pub subtotal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DocumentTotals {
    /// Sum of line bases before discounts.
    pub base_sum: f64,
    pub subtotal_sum: f64,
    pub discount_sum: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub grand_total: f64,
    /// Grand total in dollars, only in foreign mode with a positive rate.
    pub foreign_equivalent: Option<f64>,
}

pub fn compute_line_item(item: &LineItem) -> ComputedLineItem {
    let base = item.quantity * item.unit_price;
    let discount_amount = match item.discount {
        Discount::Percent(pct) => base * pct / 100.0,
        Discount::Amount(amount) => amount,
    };
    ComputedLineItem {
        item: item.clone(),
        base,
        discount_amount,
        subtotal: base - discount_amount,
    }
}

/// Aggregate computed lines. Tax applies to the discounted subtotal.
pub fn compute_document_totals(
    items: &[ComputedLineItem],
    tax_rate: f64,
    currency_mode: CurrencyMode,
    exchange_rate: f64,
) -> DocumentTotals {
    let base_sum = stable_sum(items.iter().map(|i| i.base));
    let subtotal_sum = stable_sum(items.iter().map(|i| i.subtotal));
    let discount_sum = stable_sum(items.iter().map(|i| i.discount_amount));
    let tax_amount = subtotal_sum * tax_rate / 100.0;
    let grand_total = subtotal_sum + tax_amount;
    let foreign_equivalent = match currency_mode {
        CurrencyMode::Foreign if exchange_rate > 0.0 => Some(grand_total / exchange_rate),
        _ => None,
    };

    DocumentTotals {
        base_sum,
        subtotal_sum,
        discount_sum,
        tax_rate,
        tax_amount,
        grand_total,
        foreign_equivalent,
    }
}

/// Neumaier compensated summation.
fn stable_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

/// The short summary a host shows next to the item editor.
pub fn summary_lines(totals: &DocumentTotals, exchange_rate: f64) -> Vec<String> {
    let mut lines = vec![
        format!("Subtotal (neto líneas): {}", format_local(totals.subtotal_sum)),
        format!("Descuentos: -{}", format_local(totals.discount_sum)),
        format!(
            "IVA ({}%): {}",
            format_number(totals.tax_rate),
            format_local(totals.tax_amount)
        ),
        format!("TOTAL: {}", format_local(totals.grand_total)),
    ];
    if let Some(usd) = totals.foreign_equivalent {
        lines.push(format!(
            "Equivalente USD: {} (Cotiz: {})",
            format_foreign(usd),
            format_local(exchange_rate)
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn computed(items: &[LineItem]) -> Vec<ComputedLineItem> {
        items.iter().map(compute_line_item).collect()
    }

    #[test]
    fn percent_discount() {
        let line = compute_line_item(
            &LineItem::new("Cubierta 175/65 R14", 4.0, 250.0).with_discount(Discount::Percent(10.0)),
        );
        assert_eq!(line.base, 1000.0);
        assert_eq!(line.discount_amount, 100.0);
        assert_eq!(line.subtotal, 900.0);
    }

    #[test]
    fn amount_discount_is_not_clamped() {
        let line = compute_line_item(
            &LineItem::new("Válvula", 1.0, 50.0).with_discount(Discount::Amount(80.0)),
        );
        assert_eq!(line.subtotal, -30.0);
    }

    #[test]
    fn tax_on_discounted_subtotal() {
        let items = computed(&[
            LineItem::new("Alineación", 1.0, 1000.0).with_discount(Discount::Percent(10.0)),
            LineItem::new("Balanceo", 2.0, 50.0),
        ]);
        let totals = compute_document_totals(&items, 21.0, CurrencyMode::Local, 0.0);
        assert_eq!(totals.base_sum, 1100.0);
        assert_eq!(totals.subtotal_sum, 1000.0);
        assert_eq!(totals.discount_sum, 100.0);
        assert_eq!(totals.tax_amount, 210.0);
        assert_eq!(totals.grand_total, 1210.0);
        assert_eq!(totals.foreign_equivalent, None);
    }

    #[test]
    fn foreign_equivalent_needs_positive_rate() {
        let items = computed(&[LineItem::new("Servicio", 1.0, 2000.0)]);
        let with_rate = compute_document_totals(&items, 0.0, CurrencyMode::Foreign, 1000.0);
        assert_eq!(with_rate.foreign_equivalent, Some(2.0));
        let no_rate = compute_document_totals(&items, 0.0, CurrencyMode::Foreign, 0.0);
        assert_eq!(no_rate.foreign_equivalent, None);
    }

    #[test]
    fn empty_list_is_all_zero() {
        assert_eq!(
            compute_document_totals(&[], 21.0, CurrencyMode::Local, 0.0),
            DocumentTotals {
                tax_rate: 21.0,
                ..DocumentTotals::default()
            }
        );
    }

    #[test]
    fn compensated_sum_keeps_small_terms() {
        assert_eq!(stable_sum([1e16, 1.0, -1e16]), 1.0);
        assert_eq!(stable_sum([0.1; 10]), 1.0);
    }

    #[test]
    fn summary_mentions_foreign_equivalent() {
        let items = computed(&[LineItem::new("Servicio", 1.0, 2000.0)]);
        let totals = compute_document_totals(&items, 10.5, CurrencyMode::Foreign, 1000.0);
        let lines = summary_lines(&totals, 1000.0);
        assert_eq!(lines[2], "IVA (10,5%): $ 210,00");
        assert_eq!(lines[3], "TOTAL: $ 2.210,00");
        assert_eq!(lines[4], "Equivalente USD: U$D 2,21 (Cotiz: $ 1.000,00)");
    }

    fn line_item() -> impl Strategy<Value = LineItem> {
        (0.0f64..1000.0, 0.0f64..100_000.0, any::<bool>(), 0.0f64..100.0).prop_map(
            |(quantity, unit_price, percent, value)| {
                let discount = if percent {
                    Discount::Percent(value)
                } else {
                    Discount::Amount(value)
                };
                LineItem::new("item", quantity, unit_price).with_discount(discount)
            },
        )
    }

    proptest! {
        #[test]
        fn line_formulas_hold(item in line_item()) {
            let line = compute_line_item(&item);
            prop_assert_eq!(line.base, item.quantity * item.unit_price);
            prop_assert_eq!(line.subtotal, line.base - line.discount_amount);
        }

        #[test]
        fn grand_total_is_subtotal_plus_tax(items in prop::collection::vec(line_item(), 0..40), tax in 0.0f64..100.0) {
            let totals = compute_document_totals(&computed(&items), tax, CurrencyMode::Local, 0.0);
            prop_assert_eq!(totals.grand_total, totals.subtotal_sum + totals.subtotal_sum * tax / 100.0);
        }

        #[test]
        fn totals_ignore_item_order(items in prop::collection::vec(line_item(), 0..40)) {
            let forward = computed(&items);
            let mut reversed = forward.clone();
            reversed.reverse();
            let a = compute_document_totals(&forward, 21.0, CurrencyMode::Local, 0.0);
            let b = compute_document_totals(&reversed, 21.0, CurrencyMode::Local, 0.0);
            let tolerance = 1e-9 * a.base_sum.abs().max(1.0);
            prop_assert!((a.subtotal_sum - b.subtotal_sum).abs() <= tolerance);
            prop_assert!((a.discount_sum - b.discount_sum).abs() <= tolerance);
        }
    }
}
