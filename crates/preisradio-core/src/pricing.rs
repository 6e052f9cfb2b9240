use crate::products::Product;

/// Savings derived from a product's current and previous price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceInsight {
    pub has_discount: bool,
    /// `old_price - price` when discounted, else `0.0`.
    pub discount_amount: f64,
    /// Rounded whole percent of the old price, else `0`.
    pub discount_percent: u32,
}

impl PriceInsight {
    #[must_use]
    pub fn new(price: f64, old_price: Option<f64>) -> Self {
        match old_price {
            Some(old) if old > price && old > 0.0 => {
                let amount = old - price;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let percent = (amount / old * 100.0).round() as u32;
                Self {
                    has_discount: true,
                    discount_amount: amount,
                    discount_percent: percent,
                }
            }
            _ => Self {
                has_discount: false,
                discount_amount: 0.0,
                discount_percent: 0,
            },
        }
    }

    #[must_use]
    pub fn for_product(product: &Product) -> Self {
        Self::new(product.price, product.old_price)
    }
}

/// Numeric value of a free-text discount label such as `"-15%"`.
///
/// Returns `None` when the label is missing or does not parse after
/// stripping `-` and `%`.
#[must_use]
pub fn parse_discount_label(label: Option<&str>) -> Option<f64> {
    let cleaned: String = label?
        .chars()
        .filter(|c| *c != '-' && *c != '%')
        .collect();
    cleaned
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Price formatted the way German storefront copy shows it: two decimals.
#[must_use]
pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_from_old_price() {
        let insight = PriceInsight::new(100.0, Some(150.0));
        assert!(insight.has_discount);
        assert!((insight.discount_amount - 50.0).abs() < f64::EPSILON);
        assert_eq!(insight.discount_percent, 33);
    }

    #[test]
    fn no_discount_when_old_price_not_higher() {
        assert!(!PriceInsight::new(100.0, Some(100.0)).has_discount);
        assert!(!PriceInsight::new(100.0, Some(80.0)).has_discount);
        assert!(!PriceInsight::new(100.0, None).has_discount);
    }

    #[test]
    fn discount_label_parsing() {
        assert_eq!(parse_discount_label(Some("-15%")), Some(15.0));
        assert_eq!(parse_discount_label(Some("22")), Some(22.0));
        assert_eq!(parse_discount_label(Some(" -7,5 %")), Some(7.5));
        assert_eq!(parse_discount_label(Some("Angebot")), None);
        assert_eq!(parse_discount_label(Some("")), None);
        assert_eq!(parse_discount_label(None), None);
    }

    #[test]
    fn format_price_two_decimals() {
        assert_eq!(format_price(699.0), "699.00");
        assert_eq!(format_price(19.999), "20.00");
    }
}
