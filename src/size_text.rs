//! Serde adapter for byte counts stored as decimal strings.

use serde::{Deserialize, Deserializer, Serializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Text(String),
    Number(u64),
}

pub(crate) fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match SizeRepr::deserialize(deserializer)? {
        SizeRepr::Number(value) => Ok(value),
        SizeRepr::Text(text) => text
            .trim()
            .parse()
            .map_err(|err| de::Error::custom(format!("invalid size {text:?}: {err}"))),
    }
}
