use std::num::IntErrorKind;

use serde::{Deserialize, Deserializer};

// browsers and the front-end send numbers as strings in query params and select values
#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Float(f64),
    Str(String),
}

/// Integer that may arrive as a JSON number or a numeric string. Whole floats
/// such as `2.0` count as integers. Null and blank strings become `None`;
/// anything else that is not an integer is an error.
pub fn deserialize_option_i64_from_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(value)) => Ok(Some(value)),
        Some(IntOrString::Float(value)) => {
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
                Ok(Some(value as i64))
            } else {
                Err(serde::de::Error::custom(format!(
                    "Wrong value {value}, can not parse to i64"
                )))
            }
        }
        Some(IntOrString::Str(value)) => {
            let value = value.trim();
            if value.is_empty() {
                return Ok(None);
            }
            value
                .parse::<i64>()
                .map(Some)
                .map_err(|_| {
                    serde::de::Error::custom(format!("Wrong value {value}, can not parse to i64"))
                })
        }
    }
}

// `?page=abc` falls back to the default instead of failing the request; numbers
// too large for i64 saturate so they still land past the last page
pub fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        #[serde(deserialize_with = "deserialize_option_i64_from_string")]
        value: Option<i64>,
    }

    fn parse(json: &str) -> Result<Option<i64>, serde_json::Error> {
        serde_json::from_str::<Body>(json).map(|b| b.value)
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(parse(r#"{"value": 3}"#).unwrap(), Some(3));
        assert_eq!(parse(r#"{"value": "4"}"#).unwrap(), Some(4));
        assert_eq!(parse(r#"{"value": " 5 "}"#).unwrap(), Some(5));
    }

    #[test]
    fn blank_and_null_are_absent() {
        assert_eq!(parse(r#"{"value": ""}"#).unwrap(), None);
        assert_eq!(parse(r#"{"value": null}"#).unwrap(), None);
        assert_eq!(parse(r#"{}"#).unwrap(), None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse(r#"{"value": "abc"}"#).is_err());
        assert!(parse(r#"{"value": [1]}"#).is_err());
        assert!(parse(r#"{"value": 2.5}"#).is_err());
    }

    #[test]
    fn accepts_whole_floats() {
        assert_eq!(parse(r#"{"value": 2.0}"#).unwrap(), Some(2));
        assert_eq!(parse(r#"{"value": -3.0}"#).unwrap(), Some(-3));
    }

    #[derive(Deserialize)]
    struct PageParam {
        #[serde(default)]
        #[serde(deserialize_with = "deserialize_lenient_i64")]
        page: Option<i64>,
    }

    fn page(json: &str) -> Option<i64> {
        serde_json::from_str::<PageParam>(json).unwrap().page
    }

    #[test]
    fn lenient_page_values() {
        assert_eq!(page(r#"{"page": "3"}"#), Some(3));
        assert_eq!(page(r#"{"page": "abc"}"#), None);
        assert_eq!(page(r#"{}"#), None);
    }

    #[test]
    fn oversized_page_saturates() {
        assert_eq!(page(r#"{"page": "99999999999999999999"}"#), Some(i64::MAX));
        assert_eq!(page(r#"{"page": "-99999999999999999999"}"#), Some(i64::MIN));
    }
}
