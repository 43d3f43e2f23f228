use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

/// Unit a line-item quantity is counted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum QuantityUnit {
    #[default]
    Unit,
    Set,
    Meter,
}

impl QuantityUnit {
    /// Parse a unit code. Unknown codes fall back to `Meter`.
    ///
    /// Accepts the French codes stored by the order forms (`unite`,
    /// `ensemble`) as well as the English ones.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "unit" | "units" | "unite" | "unité" | "unites" | "unités" => QuantityUnit::Unit,
            "set" | "sets" | "ensemble" | "ensembles" => QuantityUnit::Set,
            "meter" | "meters" | "metre" | "mètre" | "m" => QuantityUnit::Meter,
            other => {
                warn!(code = other, "unknown quantity unit, rendering as meters");
                QuantityUnit::Meter
            }
        }
    }
}

impl From<String> for QuantityUnit {
    fn from(code: String) -> Self {
        QuantityUnit::from_code(&code)
    }
}

/// Render a quantity with its unit, e.g. `"1 unit"`, `"432 units"`, `"2.5 m"`.
///
/// Integral quantities print without a fractional part. Only a quantity
/// exactly equal to one takes the singular form.
pub fn format_quantity(quantity: Decimal, unit: QuantityUnit) -> String {
    let singular = quantity == Decimal::ONE;
    let suffix = match unit {
        QuantityUnit::Unit if singular => "unit",
        QuantityUnit::Unit => "units",
        QuantityUnit::Set if singular => "set",
        QuantityUnit::Set => "sets",
        QuantityUnit::Meter => "m",
    };
    format!("{} {}", quantity.normalize(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn units_pluralize_on_exact_one() {
        assert_eq!(format_quantity(dec!(1), QuantityUnit::Unit), "1 unit");
        assert_eq!(format_quantity(dec!(432), QuantityUnit::Unit), "432 units");
        assert_eq!(format_quantity(dec!(0), QuantityUnit::Unit), "0 units");
        assert_eq!(format_quantity(dec!(1.5), QuantityUnit::Unit), "1.5 units");
    }

    #[test]
    fn sets_follow_the_same_rule() {
        assert_eq!(format_quantity(dec!(1), QuantityUnit::Set), "1 set");
        assert_eq!(format_quantity(dec!(3), QuantityUnit::Set), "3 sets");
    }

    #[test]
    fn meters_never_pluralize() {
        assert_eq!(format_quantity(dec!(100), QuantityUnit::Meter), "100 m");
        assert_eq!(format_quantity(dec!(1), QuantityUnit::Meter), "1 m");
    }

    #[test]
    fn integral_values_drop_the_fraction() {
        assert_eq!(format_quantity(dec!(1.0), QuantityUnit::Unit), "1 unit");
        assert_eq!(format_quantity(dec!(2.50), QuantityUnit::Meter), "2.5 m");
    }

    #[test]
    fn unit_codes_are_permissive() {
        assert_eq!(QuantityUnit::from_code("unite"), QuantityUnit::Unit);
        assert_eq!(QuantityUnit::from_code(" Ensemble "), QuantityUnit::Set);
        assert_eq!(QuantityUnit::from_code("meter"), QuantityUnit::Meter);
        assert_eq!(QuantityUnit::from_code("litre"), QuantityUnit::Meter);
        assert_eq!(QuantityUnit::from_code(""), QuantityUnit::Meter);
    }
}
