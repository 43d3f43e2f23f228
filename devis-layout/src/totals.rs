use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::LineItem;

/// Document-level money totals. Values are exact; rounding only happens
/// in [`format_amount`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub total_ht: Decimal,
    pub total_tva: Decimal,
    pub total_ttc: Decimal,
}

impl Totals {
    fn new(total_ht: Decimal, total_tva: Decimal) -> Self {
        Totals {
            total_ht,
            total_tva,
            total_ttc: total_ht + total_tva,
        }
    }

    /// Tax computed as one flat `rate_percent` of the tax-exclusive total,
    /// ignoring the per-item rates.
    pub fn with_flat_rate(items: &[LineItem], rate_percent: Decimal) -> Self {
        let total_ht = sum_ht(items);
        Totals::new(total_ht, total_ht * rate_percent / Decimal::ONE_HUNDRED)
    }
}

/// Sum the per-item amounts in input order.
pub fn aggregate(items: &[LineItem]) -> Totals {
    let total_tva: Decimal = items.iter().map(LineItem::amount_tva).sum();
    Totals::new(sum_ht(items), total_tva)
}

fn sum_ht(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::amount_ht).sum()
}

/// Round half away from zero to two decimals, e.g. `"1234.50"`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::QuantityUnit;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, price: Decimal, rate: Decimal) -> LineItem {
        LineItem::new("item", quantity, QuantityUnit::Unit, price, rate)
    }

    #[test]
    fn empty_input_is_all_zero() {
        let totals = aggregate(&[]);
        assert_eq!(totals, Totals::default());
        assert_eq!(format_amount(totals.total_ttc), "0.00");
    }

    #[test]
    fn mixed_rates_sum_per_item() {
        let items = [
            item(dec!(2), dec!(100), dec!(20)),
            item(dec!(1), dec!(50), dec!(5.5)),
            item(dec!(3), dec!(10), dec!(0)),
        ];
        let totals = aggregate(&items);
        assert_eq!(totals.total_ht, dec!(280));
        assert_eq!(totals.total_tva, dec!(42.75));
        assert_eq!(totals.total_ttc, dec!(322.75));
    }

    #[test]
    fn flat_rate_ignores_item_rates() {
        let items = [item(dec!(1), dec!(100), dec!(5.5))];
        let totals = Totals::with_flat_rate(&items, dec!(20));
        assert_eq!(totals.total_tva, dec!(20));
        assert_eq!(totals.total_ttc, dec!(120));
    }

    #[test]
    fn no_rounding_before_aggregation() {
        // 3 x 0.333 rounded per item would give 0.99; exact sum is 0.999.
        let items = [
            item(dec!(1), dec!(0.333), dec!(0)),
            item(dec!(1), dec!(0.333), dec!(0)),
            item(dec!(1), dec!(0.333), dec!(0)),
        ];
        let totals = aggregate(&items);
        assert_eq!(format_amount(totals.total_ht), "1.00");
    }

    #[test]
    fn amounts_round_half_away_from_zero() {
        assert_eq!(format_amount(dec!(1234.5)), "1234.50");
        assert_eq!(format_amount(dec!(0.125)), "0.13");
        assert_eq!(format_amount(dec!(2.675)), "2.68");
        assert_eq!(format_amount(dec!(-0.125)), "-0.13");
        assert_eq!(format_amount(dec!(7)), "7.00");
    }

    #[test]
    fn rendered_totals_add_up_within_a_cent() {
        let items = [
            item(dec!(3), dec!(19.99), dec!(20)),
            item(dec!(7.5), dec!(12.345), dec!(10)),
            item(dec!(1), dec!(0.005), dec!(5.5)),
        ];
        let totals = aggregate(&items);
        let ht: Decimal = format_amount(totals.total_ht).parse().unwrap();
        let tva: Decimal = format_amount(totals.total_tva).parse().unwrap();
        let ttc: Decimal = format_amount(totals.total_ttc).parse().unwrap();
        assert!((ht + tva - ttc).abs() <= dec!(0.01));
    }
}
