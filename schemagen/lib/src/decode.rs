//! Streaming decoder plumbing shared by the schema entities.
//!
//! Every entity is decoded from a JSON mapping one key at a time. A key is
//! first offered to the entity's fixed slots; whatever is left over is kept
//! in its [`Attributes`] bag. Repeated keys inside one mapping are rejected.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

use serde::de::{Error as _, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use serde_json::value::RawValue;
use tracing::trace;

use crate::attributes::Attributes;

/// Key whose presence turns a field record into a constant field.
pub const CONSTANT_KEY: &str = "constant";

/// An entity that can be decoded key by key.
pub(crate) trait DecodeEntity: Default {
    /// What the visitor reports when the input is not a mapping.
    const EXPECTING: &'static str;

    fn attributes_mut(&mut self) -> &mut Attributes;

    /// Decodes `key` into a fixed slot. Returns `false` when the key is not
    /// one of this entity's slots and its value has not been consumed.
    fn decode_key<'de, A>(&mut self, key: &str, map: &mut A) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>;
}

pub(crate) struct EntityVisitor<T>(PhantomData<T>);

impl<T> EntityVisitor<T> {
    pub(crate) fn new() -> Self {
        Self(PhantomData)
    }
}

impl<'de, T: DecodeEntity> Visitor<'de> for EntityVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::EXPECTING)
    }

    fn visit_map<A>(self, mut map: A) -> Result<T, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entity = T::default();
        let mut seen = HashSet::new();

        while let Some(key) = map.next_key::<String>()? {
            if !seen.insert(key.clone()) {
                return Err(A::Error::custom(format_args!("duplicate key {key:?}")));
            }

            if entity.decode_key(&key, &mut map)? {
                continue;
            }

            let value: Value = decode_slot(&mut map, &key)?;
            trace!(key = %key, "captured attribute");
            entity.attributes_mut().insert(key, value);
        }

        Ok(entity)
    }
}

/// Decodes the value for `key`, naming the key in any error.
pub(crate) fn decode_slot<'de, A, T>(map: &mut A, key: &str) -> Result<T, A::Error>
where
    A: MapAccess<'de>,
    T: Deserialize<'de>,
{
    map.next_value()
        .map_err(|e| A::Error::custom(format_args!("failed to decode key {key:?}: {e}")))
}

/// Reports whether a raw field record carries the constant discriminator.
///
/// Only the record's keys are inspected; values are skipped without being
/// materialized. `"constant": null` still counts as present.
pub(crate) fn has_constant_key(raw: &RawValue) -> Result<bool, serde_json::Error> {
    let keys: HashMap<String, IgnoredAny> = serde_json::from_str(raw.get())?;
    Ok(keys.contains_key(CONSTANT_KEY))
}
