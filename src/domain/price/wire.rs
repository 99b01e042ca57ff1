//! Wire types for the price event stream.

use serde::Deserialize;
use serde_json::Value;

use super::PricePoint;
use crate::error::SdkError;
use crate::shared::ProductKey;

/// Raw `price` event payload: `{sku, price, ts}`.
///
/// Fields are kept loose on purpose: the stream is parsed defensively and
/// normalized by [`parse_price_event`].
#[derive(Debug, Clone, Deserialize)]
pub struct PriceEvent {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub ts: Value,
}

/// Parse one event payload into a keyed price point.
///
/// - `sku` missing or empty → [`ProductKey::DEFAULT`]
/// - `price` must be a finite number or a numeric string
/// - `ts` missing, non-numeric, non-finite or non-positive → `now_ms`
pub fn parse_price_event(data: &str, now_ms: i64) -> Result<(ProductKey, PricePoint), SdkError> {
    let event: PriceEvent = serde_json::from_str(data)?;

    let key = match event.sku {
        Some(sku) if !sku.trim().is_empty() => ProductKey::new(sku),
        _ => ProductKey::unspecified(),
    };

    let price = number(&event.price)
        .ok_or_else(|| SdkError::Validation(format!("invalid price: {}", event.price)))?;

    let timestamp = number(&event.ts)
        .filter(|ts| *ts > 0.0)
        .map(|ts| ts as i64)
        .unwrap_or(now_ms);

    Ok((key, PricePoint::new(timestamp, price)))
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_full_payload() {
        let (key, point) =
            parse_price_event(r#"{"sku":"A1","price":12.5,"ts":1699999999000}"#, NOW).unwrap();
        assert_eq!(key.as_str(), "A1");
        assert_eq!(point, PricePoint::new(1_699_999_999_000, 12.5));
    }

    #[test]
    fn test_missing_ts_defaults_to_now() {
        let (_, point) = parse_price_event(r#"{"sku":"A1","price":3}"#, NOW).unwrap();
        assert_eq!(point.timestamp, NOW);
    }

    #[test]
    fn test_invalid_ts_defaults_to_now() {
        let (_, point) = parse_price_event(r#"{"sku":"A1","price":3,"ts":"later"}"#, NOW).unwrap();
        assert_eq!(point.timestamp, NOW);
        let (_, point) = parse_price_event(r#"{"sku":"A1","price":3,"ts":-5}"#, NOW).unwrap();
        assert_eq!(point.timestamp, NOW);
    }

    #[test]
    fn test_missing_sku_uses_sentinel() {
        let (key, _) = parse_price_event(r#"{"price":1.0}"#, NOW).unwrap();
        assert_eq!(key, ProductKey::unspecified());
        let (key, _) = parse_price_event(r#"{"sku":"","price":1.0}"#, NOW).unwrap();
        assert_eq!(key, ProductKey::unspecified());
    }

    #[test]
    fn test_numeric_string_price() {
        let (_, point) = parse_price_event(r#"{"sku":"A1","price":"9.75"}"#, NOW).unwrap();
        assert_eq!(point.price, 9.75);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            parse_price_event("{not json", NOW),
            Err(SdkError::Serde(_))
        ));
    }

    #[test]
    fn test_missing_price_is_error() {
        assert!(matches!(
            parse_price_event(r#"{"sku":"A1"}"#, NOW),
            Err(SdkError::Validation(_))
        ));
    }
}
