//! Typed decoding of a success payload.
//!
//! The target type is classified **once** per call by probing its
//! [`Deserialize`](serde::Deserialize) impl ([`classify`]); the matching
//! routine then runs:
//!
//! * [`ResultShape::Scalar`] – numbers, text, booleans, `char`, transparent
//!   newtypes around them and `Option` of any of these. Only the payload's
//!   `"result"` field is decoded.
//! * [`ResultShape::Structured`] – everything else. The whole payload is
//!   deserialised field by field.
//!
//! Externally tagged enums count as scalars: `{"result": "Positive"}` decodes
//! into `enum Sign { Positive, Negative }`. Internally tagged and untagged
//! enums are structured.
//!
//! The advisory `"successful"` flag is removed by the envelope check before
//! decoding, so structured targets never see it. Read it from
//! [`Envelope::successful`](crate::envelope::Envelope) when it matters.
//!
//! # Integer policy
//!
//! Models frequently emit integral answers as floats (`15.0`). An integer
//! target accepts a float only if it is finite, has no fractional part and
//! fits the target type; `15.5` or `1e300` are a
//! [`AnyFuncError::TypeMismatch`]. Text is never parsed into numbers.
//!
//! The same rule applies inside structured payloads: every integral float,
//! nested ones included, is handed to `T` as an integer, so
//! `{"quotient": 3.0}` fills an `i64` field. Float fields still accept it.
//!
//! ```rust
//! use anyfunc_core::decode::decode;
//! use serde_json::json;
//!
//! let payload = json!({"result": 15.0}).as_object().cloned().unwrap();
//! assert_eq!(decode::<u32>(payload).unwrap(), 15);
//! ```
use std::fmt::Display;

use serde::{
    de::{DeserializeOwned, Visitor},
    Deserializer,
};
use serde_json::{Map, Value};

use crate::{
    envelope::RESULT_FIELD,
    error::{AnyFuncError, Result},
};

/// How a target type is populated from a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    Scalar(ScalarKind),
    Structured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Signed,
    Unsigned,
    Float,
    Char,
    Text,
    Variant,
}

impl ScalarKind {
    fn expected(self) -> &'static str {
        match self {
            ScalarKind::Bool => "a boolean",
            ScalarKind::Signed => "an integer",
            ScalarKind::Unsigned => "a non-negative integer",
            ScalarKind::Float => "a number",
            ScalarKind::Char => "a single character",
            ScalarKind::Text => "a string",
            ScalarKind::Variant => "an enum variant",
        }
    }
}

/// Decode a success payload into `T`.
pub fn decode<T: DeserializeOwned>(payload: Map<String, Value>) -> Result<T> {
    match classify::<T>() {
        ResultShape::Scalar(kind) => decode_scalar(kind, payload),
        ResultShape::Structured => decode_structured(payload),
    }
}

/// Determine the shape of `T` without decoding anything.
pub fn classify<T: DeserializeOwned>() -> ResultShape {
    match T::deserialize(ShapeProbe) {
        Err(Classified(shape)) => shape,
        Ok(_) => ResultShape::Structured,
    }
}

fn decode_scalar<T: DeserializeOwned>(
    kind: ScalarKind,
    mut payload: Map<String, Value>,
) -> Result<T> {
    let Some(found) = payload.shift_remove(RESULT_FIELD) else {
        return Err(AnyFuncError::MissingField {
            field: RESULT_FIELD,
            payload,
        });
    };

    let mismatch = |found: &Value| AnyFuncError::TypeMismatch {
        field: RESULT_FIELD,
        expected: kind.expected(),
        found: found.clone(),
    };

    let value = coerce(kind, &found).ok_or_else(|| mismatch(&found))?;
    T::deserialize(&value).map_err(|_| mismatch(&found))
}

/// Bring `found` into the JSON form `kind` deserialises from. `null` passes
/// through so `Option` targets can decode it.
fn coerce(kind: ScalarKind, found: &Value) -> Option<Value> {
    match (kind, found) {
        (_, Value::Null) => Some(Value::Null),
        (ScalarKind::Signed | ScalarKind::Unsigned, Value::Number(number)) => {
            if number.is_i64() || number.is_u64() {
                return Some(found.clone());
            }
            number.as_f64().and_then(integral)
        }
        (ScalarKind::Float, Value::Number(_))
        | (ScalarKind::Bool, Value::Bool(_))
        | (ScalarKind::Char | ScalarKind::Text, Value::String(_))
        | (ScalarKind::Variant, Value::String(_)) => Some(found.clone()),
        (ScalarKind::Variant, Value::Object(_)) => {
            let mut variant = found.clone();
            integral_floats_to_ints(&mut variant);
            Some(variant)
        }
        _ => None,
    }
}

/// Exact integral value of `float`, if it has one in `i64` or `u64` range.
fn integral(float: f64) -> Option<Value> {
    if !float.is_finite() || float.fract() != 0.0 {
        return None;
    }
    // 2^63 and 2^64 are exactly representable; both bounds are exclusive.
    const I64_END: f64 = 9_223_372_036_854_775_808.0;
    const U64_END: f64 = 18_446_744_073_709_551_616.0;

    if (-I64_END..I64_END).contains(&float) {
        Some(Value::from(float as i64))
    } else if (0.0..U64_END).contains(&float) {
        Some(Value::from(float as u64))
    } else {
        None
    }
}

fn decode_structured<T: DeserializeOwned>(payload: Map<String, Value>) -> Result<T> {
    let mut value = Value::Object(payload);
    let mut normalized = value.clone();
    integral_floats_to_ints(&mut normalized);

    T::deserialize(&normalized).map_err(|err| AnyFuncError::SchemaMismatch {
        reason: err.to_string(),
        payload: match value.take() {
            Value::Object(payload) => payload,
            _ => Map::new(),
        },
    })
}

/// Rewrite every integral float in `value` as an integer, recursively.
fn integral_floats_to_ints(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(integral_floats_to_ints),
        Value::Object(fields) => fields.values_mut().for_each(integral_floats_to_ints),
        _ => {
            if let Some(int) = value.as_f64().filter(|_| value.is_f64()).and_then(integral) {
                *value = int;
            }
        }
    }
}

/// Deserializer that records which entry point a `Deserialize` impl calls and
/// stops there.
struct ShapeProbe;

#[derive(Debug)]
struct Classified(ResultShape);

impl Display for Classified {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "classified as {:?}", self.0)
    }
}

impl std::error::Error for Classified {}

impl serde::de::Error for Classified {
    fn custom<T: Display>(_msg: T) -> Self {
        Classified(ResultShape::Structured)
    }
}

macro_rules! probe_scalar {
    ($($method:ident => $kind:ident),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(
                self,
                _visitor: V,
            ) -> std::result::Result<V::Value, Classified> {
                Err(Classified(ResultShape::Scalar(ScalarKind::$kind)))
            }
        )*
    };
}

impl<'de> Deserializer<'de> for ShapeProbe {
    type Error = Classified;

    fn deserialize_any<V: Visitor<'de>>(
        self,
        _visitor: V,
    ) -> std::result::Result<V::Value, Classified> {
        Err(Classified(ResultShape::Structured))
    }

    probe_scalar! {
        deserialize_bool => Bool,
        deserialize_i8 => Signed,
        deserialize_i16 => Signed,
        deserialize_i32 => Signed,
        deserialize_i64 => Signed,
        deserialize_i128 => Signed,
        deserialize_u8 => Unsigned,
        deserialize_u16 => Unsigned,
        deserialize_u32 => Unsigned,
        deserialize_u64 => Unsigned,
        deserialize_u128 => Unsigned,
        deserialize_f32 => Float,
        deserialize_f64 => Float,
        deserialize_char => Char,
        deserialize_str => Text,
        deserialize_string => Text,
    }

    fn deserialize_option<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> std::result::Result<V::Value, Classified> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, Classified> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> std::result::Result<V::Value, Classified> {
        Err(Classified(ResultShape::Scalar(ScalarKind::Variant)))
    }

    serde::forward_to_deserialize_any! {
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}
