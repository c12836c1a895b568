//! Item normalization: raw form records into strict numeric items.
//!
//! Text fields are read the way a browser form reads them: leading whitespace
//! is skipped and the longest numeric prefix wins (`"50 cm"` is 50, `"2.7"` as
//! a quantity is 2). Records with any unparseable field are dropped; nothing is
//! reported to the caller beyond the count of dropped records.

use thiserror::Error;

use crate::model::{Item, RawField, RawItem};

/// Why a single field could not be read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldParseError {
    #[error("'{0}' has no numeric prefix")]
    NotNumeric(String),
    #[error("value {0} is not finite")]
    NonFinite(f64),
    #[error("quantity {0} is negative")]
    NegativeQuantity(f64),
    #[error("quantity {0} is out of range")]
    QuantityOutOfRange(f64),
}

/// Result of normalizing a batch of raw records.
#[derive(Clone, Debug, Default)]
pub struct NormalizedItems {
    /// Valid items in input order
    pub items: Vec<Item>,
    /// Number of records that were dropped
    pub dropped: usize,
}

/// Normalizes all records, keeping input order and dropping invalid ones.
///
/// # Examples
/// ```
/// use container_load_planner::model::RawItem;
/// use container_load_planner::normalizer::normalize_items;
///
/// let raw = vec![
///     RawItem::from_text("ok", ("50", "40", "30"), "20", "2"),
///     RawItem::from_text("bad", ("50", "40", "30"), "abc", "1"),
/// ];
/// let normalized = normalize_items(&raw);
/// assert_eq!(normalized.items.len(), 1);
/// assert_eq!(normalized.dropped, 1);
/// ```
pub fn normalize_items(raw_items: &[RawItem]) -> NormalizedItems {
    let mut result = NormalizedItems::default();
    for (index, raw) in raw_items.iter().enumerate() {
        match normalize_item(raw) {
            Ok(item) => result.items.push(item),
            Err(err) => {
                log::debug!("dropping item #{} ('{}'): {}", index, raw.name, err);
                result.dropped += 1;
            }
        }
    }
    result
}

/// Normalizes a single record.
pub fn normalize_item(raw: &RawItem) -> Result<Item, FieldParseError> {
    let length = parse_float_field(&raw.length)?;
    let width = parse_float_field(&raw.width)?;
    let height = parse_float_field(&raw.height)?;
    let weight = parse_float_field(&raw.weight)?;
    let quantity = parse_quantity_field(&raw.quantity)?;

    Ok(Item {
        name: raw.name.clone(),
        length,
        width,
        height,
        weight,
        quantity,
        stackable: raw.stackable,
        fragile: raw.fragile,
    })
}

fn parse_float_field(field: &RawField) -> Result<f64, FieldParseError> {
    let value = match field {
        RawField::Number(value) => *value,
        RawField::Text(text) => {
            let prefix = float_prefix(text);
            prefix
                .parse::<f64>()
                .map_err(|_| FieldParseError::NotNumeric(text.clone()))?
        }
        RawField::Other(value) => return Err(FieldParseError::NotNumeric(value.to_string())),
    };
    if !value.is_finite() {
        return Err(FieldParseError::NonFinite(value));
    }
    Ok(value)
}

fn parse_quantity_field(field: &RawField) -> Result<u32, FieldParseError> {
    let value = match field {
        RawField::Number(value) => value.trunc(),
        RawField::Text(text) => {
            let prefix = integer_prefix(text);
            prefix
                .parse::<f64>()
                .map_err(|_| FieldParseError::NotNumeric(text.clone()))?
        }
        RawField::Other(value) => return Err(FieldParseError::NotNumeric(value.to_string())),
    };
    if !value.is_finite() {
        return Err(FieldParseError::NonFinite(value));
    }
    if value < 0.0 {
        return Err(FieldParseError::NegativeQuantity(value));
    }
    if value > f64::from(u32::MAX) {
        return Err(FieldParseError::QuantityOutOfRange(value));
    }
    // `-0` truncates to 0 as well
    Ok(value as u32)
}

/// Longest prefix of the form `[+-]?(digits[.digits]|.digits)([eE][+-]?digits)?`.
fn float_prefix(text: &str) -> &str {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    &s[..end]
}

/// Longest prefix of the form `[+-]?digits`.
fn integer_prefix(text: &str) -> &str {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    if digits == 0 {
        return "";
    }
    &s[..sign + digits]
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> RawField {
        RawField::Text(value.to_string())
    }

    #[test]
    fn float_prefix_follows_form_parsing() {
        assert_eq!(float_prefix("50"), "50");
        assert_eq!(float_prefix("  12.5cm"), "12.5");
        assert_eq!(float_prefix("-3.25e2x"), "-3.25e2");
        assert_eq!(float_prefix(".5"), ".5");
        assert_eq!(float_prefix("7."), "7.");
        assert_eq!(float_prefix("1e"), "1");
        assert_eq!(float_prefix("1e+"), "1");
        assert_eq!(float_prefix("abc"), "");
        assert_eq!(float_prefix("."), "");
        assert_eq!(float_prefix(""), "");
        assert_eq!(float_prefix("-"), "");
    }

    #[test]
    fn integer_prefix_stops_at_decimal_point() {
        assert_eq!(integer_prefix("2.7"), "2");
        assert_eq!(integer_prefix(" 12 pcs"), "12");
        assert_eq!(integer_prefix("-4"), "-4");
        assert_eq!(integer_prefix("x1"), "");
    }

    #[test]
    fn parses_text_and_number_fields() {
        assert_eq!(parse_float_field(&text("50 cm")), Ok(50.0));
        assert_eq!(parse_float_field(&RawField::Number(12.5)), Ok(12.5));
        assert!(matches!(
            parse_float_field(&text("abc")),
            Err(FieldParseError::NotNumeric(_))
        ));
        assert!(matches!(
            parse_float_field(&text("")),
            Err(FieldParseError::NotNumeric(_))
        ));
        assert!(matches!(
            parse_float_field(&text("1e999")),
            Err(FieldParseError::NonFinite(_))
        ));
    }

    #[test]
    fn non_numeric_json_values_are_not_numeric() {
        for field in [
            RawField::Other(serde_json::Value::Null),
            RawField::Other(serde_json::Value::Bool(true)),
        ] {
            assert!(matches!(
                parse_float_field(&field),
                Err(FieldParseError::NotNumeric(_))
            ));
            assert!(matches!(
                parse_quantity_field(&field),
                Err(FieldParseError::NotNumeric(_))
            ));
        }
    }

    #[test]
    fn quantity_is_truncated_and_non_negative() {
        assert_eq!(parse_quantity_field(&text("2.7")), Ok(2));
        assert_eq!(parse_quantity_field(&RawField::Number(3.9)), Ok(3));
        assert_eq!(parse_quantity_field(&text("0")), Ok(0));
        assert!(matches!(
            parse_quantity_field(&text("-1")),
            Err(FieldParseError::NegativeQuantity(_))
        ));
        assert!(matches!(
            parse_quantity_field(&text("99999999999")),
            Err(FieldParseError::QuantityOutOfRange(_))
        ));
    }

    #[test]
    fn drops_records_with_any_bad_field_and_keeps_order() {
        let raw = vec![
            RawItem::from_text("first", ("10", "10", "10"), "1", "1"),
            RawItem::from_text("bad-weight", ("10", "10", "10"), "abc", "1"),
            RawItem::from_text("bad-length", ("", "10", "10"), "1", "1"),
            RawItem::from_text("bad-quantity", ("10", "10", "10"), "1", "many"),
            RawItem::from_text("last", ("20", "20", "20"), "2", "3"),
        ];

        let normalized = normalize_items(&raw);
        let names: Vec<&str> = normalized.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["first", "last"]);
        assert_eq!(normalized.dropped, 3);
    }

    #[test]
    fn carries_flags_through() {
        let mut raw = RawItem::from_text("glass", ("10", "10", "10"), "1", "1");
        raw.stackable = true;
        raw.fragile = true;

        let item = normalize_item(&raw).expect("valid record");
        assert!(item.stackable);
        assert!(item.fragile);
    }
}
