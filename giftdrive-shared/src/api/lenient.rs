//! Integer fields that older form clients post as strings ("8" instead of 8).

use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

fn to_i32<E: Error>(v: IntOrString) -> Result<i32, E> {
    let n = match v {
        IntOrString::Int(n) => n,
        IntOrString::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| E::custom(format!("expected an integer, got {s:?}")))?,
    };
    i32::try_from(n).map_err(|_| E::custom(format!("integer out of range: {n}")))
}

pub(crate) fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    to_i32(IntOrString::deserialize(d)?)
}

pub(crate) fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    match Option::<IntOrString>::deserialize(d)? {
        None => Ok(None),
        Some(IntOrString::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => to_i32(v).map(Some),
    }
}
