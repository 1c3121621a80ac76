//! Serde representation for `f64` fields that may hold NaN or infinities
//!
//! Finite values are written as plain numbers. NaN, `+inf` and `-inf` are
//! written as the strings `"NaN"`, `"inf"` and `"-inf"` so that formats
//! without non-finite numbers (JSON) keep them. Use with
//! `#[serde(with = "data_validator::non_finite")]`.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serializer};

const NAN: &str = "NaN";
const POS_INF: &str = "inf";
const NEG_INF: &str = "-inf";

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str(NAN)
    } else if value.is_sign_positive() {
        serializer.serialize_str(POS_INF)
    } else {
        serializer.serialize_str(NEG_INF)
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(value) => Ok(value),
        Repr::Text(text) => match text.as_str() {
            NAN => Ok(f64::NAN),
            POS_INF => Ok(f64::INFINITY),
            NEG_INF => Ok(f64::NEG_INFINITY),
            other => Err(de::Error::invalid_value(
                Unexpected::Str(other),
                &"a number, \"NaN\", \"inf\" or \"-inf\"",
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        value: f64,
    }

    fn round_trip(value: f64) -> (String, f64) {
        let json = serde_json::to_string(&Wrapper { value }).unwrap();
        let parsed: Wrapper = serde_json::from_str(&json).unwrap();
        (json, parsed.value)
    }

    #[test]
    fn test_finite_stays_numeric() {
        assert_eq!(round_trip(0.25), (r#"{"value":0.25}"#.to_string(), 0.25));
    }

    #[test]
    fn test_non_finite_written_as_text() {
        let (json, value) = round_trip(f64::NAN);
        assert_eq!(json, r#"{"value":"NaN"}"#);
        assert!(value.is_nan());

        assert_eq!(round_trip(f64::INFINITY).1, f64::INFINITY);
        assert_eq!(round_trip(f64::NEG_INFINITY).1, f64::NEG_INFINITY);
    }

    #[test]
    fn test_integer_json_reads_as_float() {
        let parsed: Wrapper = serde_json::from_str(r#"{"value":3}"#).unwrap();
        assert_eq!(parsed.value, 3.0);
    }

    #[test]
    fn test_unknown_text_rejected() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"huge"}"#).is_err());
    }
}
