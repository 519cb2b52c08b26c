//! Symmetric converters between semantic values and stored bytes.
//!
//! Every converter obeys the round-trip law: `decode(encode(x))`
//! reconstructs a value observationally equal to `x` for every supported
//! value of its type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use thiserror::Error;

/// Failure to encode or decode a single value.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ConvertError(String);

impl ConvertError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// Symmetric byte codec for one semantic type.
pub trait Converter {
    type Value;

    fn encode(value: &Self::Value) -> Result<Vec<u8>, ConvertError>;
    fn decode(bytes: &[u8]) -> Result<Self::Value, ConvertError>;
}

/// Identity converter over raw byte values.
pub struct BytesConverter;

impl Converter for BytesConverter {
    type Value = Vec<u8>;

    fn encode(value: &Vec<u8>) -> Result<Vec<u8>, ConvertError> {
        Ok(value.clone())
    }

    fn decode(bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
        Ok(bytes.to_vec())
    }
}

/// UTF-8 string converter.
pub struct StringConverter;

impl Converter for StringConverter {
    type Value = String;

    fn encode(value: &String) -> Result<Vec<u8>, ConvertError> {
        Ok(value.as_bytes().to_vec())
    }

    fn decode(bytes: &[u8]) -> Result<String, ConvertError> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|err| ConvertError::new(format!("invalid utf-8: {err}")))
    }
}

macro_rules! fixed_width_converter {
    ($name:ident, $ty:ty, $width:expr) => {
        /// Fixed-width little-endian integer converter.
        pub struct $name;

        impl Converter for $name {
            type Value = $ty;

            fn encode(value: &$ty) -> Result<Vec<u8>, ConvertError> {
                Ok(value.to_le_bytes().to_vec())
            }

            fn decode(bytes: &[u8]) -> Result<$ty, ConvertError> {
                let raw: [u8; $width] = bytes.try_into().map_err(|_| {
                    ConvertError::new(format!("expected {} bytes, got {}", $width, bytes.len()))
                })?;
                Ok(<$ty>::from_le_bytes(raw))
            }
        }
    };
}

fixed_width_converter!(U16Converter, u16, 2);
fixed_width_converter!(U32Converter, u32, 4);
fixed_width_converter!(U64Converter, u64, 8);

/// Single-byte boolean converter.
pub struct BoolConverter;

impl Converter for BoolConverter {
    type Value = bool;

    fn encode(value: &bool) -> Result<Vec<u8>, ConvertError> {
        Ok(vec![u8::from(*value)])
    }

    fn decode(bytes: &[u8]) -> Result<bool, ConvertError> {
        match bytes {
            [0] => Ok(false),
            [1] => Ok(true),
            _ => Err(ConvertError::new(format!(
                "expected a single 0/1 byte, got {} bytes",
                bytes.len()
            ))),
        }
    }
}

/// Structural converter for any serde-compatible value.
pub struct JsonConverter<T> {
    _value: PhantomData<T>,
}

impl<T> Converter for JsonConverter<T>
where
    T: Serialize + DeserializeOwned,
{
    type Value = T;

    fn encode(value: &T) -> Result<Vec<u8>, ConvertError> {
        serde_json::to_vec(value).map_err(|err| ConvertError::new(err.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<T, ConvertError> {
        serde_json::from_slice(bytes).map_err(|err| ConvertError::new(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        flags: Vec<bool>,
    }

    #[test]
    fn string_round_trip() {
        for text in ["", "governance", "zürich ⚖ quorum"] {
            let encoded = StringConverter::encode(&text.to_string()).unwrap();
            assert_eq!(StringConverter::decode(&encoded).unwrap(), text);
        }
    }

    #[test]
    fn string_decode_rejects_invalid_utf8() {
        assert!(StringConverter::decode(&[0xff, 0xfe, 0x01]).is_err());
    }

    #[test]
    fn fixed_width_round_trip_at_boundaries() {
        for value in [0u16, 1, u16::MAX] {
            let encoded = U16Converter::encode(&value).unwrap();
            assert_eq!(encoded.len(), 2);
            assert_eq!(U16Converter::decode(&encoded).unwrap(), value);
        }
        for value in [0u32, 1, u32::MAX] {
            assert_eq!(
                U32Converter::decode(&U32Converter::encode(&value).unwrap()).unwrap(),
                value
            );
        }
        for value in [0u64, 1, u64::MAX] {
            assert_eq!(
                U64Converter::decode(&U64Converter::encode(&value).unwrap()).unwrap(),
                value
            );
        }
    }

    #[test]
    fn fixed_width_decode_rejects_wrong_length() {
        assert!(U16Converter::decode(&[]).is_err());
        assert!(U16Converter::decode(&[1, 2, 3]).is_err());
        assert!(U64Converter::decode(&[0; 7]).is_err());
    }

    #[test]
    fn bool_round_trip_and_rejects_garbage() {
        for value in [true, false] {
            let encoded = BoolConverter::encode(&value).unwrap();
            assert_eq!(BoolConverter::decode(&encoded).unwrap(), value);
        }
        assert!(BoolConverter::decode(&[2]).is_err());
        assert!(BoolConverter::decode(&[]).is_err());
        assert!(BoolConverter::decode(&[0, 0]).is_err());
    }

    #[test]
    fn bytes_round_trip() {
        let value = vec![0u8, 255, 17];
        let encoded = BytesConverter::encode(&value).unwrap();
        assert_eq!(BytesConverter::decode(&encoded).unwrap(), value);
    }

    #[test]
    fn json_round_trip_structural_values() {
        for value in [json!({}), json!({"outer": {"inner": [1, 2, 3]}}), json!(null)] {
            let encoded = JsonConverter::<Value>::encode(&value).unwrap();
            assert_eq!(JsonConverter::<Value>::decode(&encoded).unwrap(), value);
        }

        let record = Record {
            name: "m1".to_string(),
            flags: vec![true, false],
        };
        let encoded = JsonConverter::<Record>::encode(&record).unwrap();
        assert_eq!(JsonConverter::<Record>::decode(&encoded).unwrap(), record);
    }

    #[test]
    fn json_decode_failure_is_reported() {
        let err = JsonConverter::<Record>::decode(b"not json").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
