//! Naming and metadata shared by every schema entity.

use once_cell::unsync::OnceCell;
use serde::de::MapAccess;

use crate::attributes::Attributes;
use crate::decode::decode_slot;
use crate::naming;

/// The part of a [`Field`](crate::field::Field) or
/// [`Object`](crate::object::Object) that carries its name.
///
/// Derived names are computed on first request and cached per form. An
/// explicit override for a form always wins over derivation.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    name: String,
    exported_name: Option<String>,
    unexported_name: Option<String>,
    comment: Option<String>,
    attributes: Attributes,
    exported: OnceCell<String>,
    unexported: OnceCell<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Overrides the exported form instead of deriving it.
    pub fn with_exported_name(mut self, name: impl Into<String>) -> Self {
        self.exported_name = Some(name.into());
        self
    }

    /// Overrides the unexported form instead of deriving it.
    pub fn with_unexported_name(mut self, name: impl Into<String>) -> Self {
        self.unexported_name = Some(name.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The name exactly as declared in the schema.
    pub fn declared_name(&self) -> &str {
        &self.name
    }

    /// Returns the exported (`exported = true`) or unexported identifier.
    ///
    /// ## Examples
    ///
    /// ```
    /// use schemagen::entity::Entity;
    ///
    /// let entity = Entity::new("key_id");
    /// assert_eq!(entity.name(true), "KeyId");
    /// assert_eq!(entity.name(false), "keyId");
    ///
    /// let acronym = Entity::new("ID");
    /// assert_eq!(acronym.name(true), "ID");
    /// assert_eq!(acronym.name(false), "id");
    /// ```
    pub fn name(&self, exported: bool) -> &str {
        if exported {
            match self.exported_name.as_deref() {
                Some(name) if !name.is_empty() => name,
                _ => self
                    .exported
                    .get_or_init(|| naming::exported_name(&self.name))
                    .as_str(),
            }
        } else {
            match self.unexported_name.as_deref() {
                Some(name) if !name.is_empty() => name,
                _ => self
                    .unexported
                    .get_or_init(|| naming::unexported_name(&self.name))
                    .as_str(),
            }
        }
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Keys from the schema that no fixed slot claimed.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Decodes `key` into a base slot if it is one of the keys every entity
    /// understands. Returns `false` for keys that belong elsewhere.
    pub(crate) fn decode_key<'de, A>(&mut self, key: &str, map: &mut A) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>,
    {
        let slot = match key {
            "name" => {
                self.name = decode_slot::<A, Option<String>>(map, key)?.unwrap_or_default();
                return Ok(true);
            }
            "exported_name" => &mut self.exported_name,
            "unexported_name" => &mut self.unexported_name,
            "comment" => &mut self.comment,
            _ => return Ok(false),
        };
        *slot = decode_slot(map, key)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names_are_memoized() {
        let entity = Entity::new("public_key");
        let first = entity.name(true).as_ptr();
        let second = entity.name(true).as_ptr();
        assert_eq!(first, second);
        assert_eq!(entity.name(true), "PublicKey");
        assert_eq!(entity.name(false), "publicKey");
    }

    #[test]
    fn overrides_win_over_derivation() {
        let entity = Entity::new("Field1")
            .with_exported_name("Foo")
            .with_unexported_name("bar");
        assert_eq!(entity.name(true), "Foo");
        assert_eq!(entity.name(false), "bar");
        assert_eq!(entity.declared_name(), "Field1");
    }

    #[test]
    fn override_for_one_form_leaves_the_other_derived() {
        let entity = Entity::new("key_type").with_exported_name("Kty");
        assert_eq!(entity.name(true), "Kty");
        assert_eq!(entity.name(false), "keyType");
    }

    #[test]
    fn empty_override_falls_back_to_derivation() {
        let entity = Entity::new("algorithm").with_exported_name("");
        assert_eq!(entity.name(true), "Algorithm");
    }

    #[test]
    fn comment_and_attributes_default_empty() {
        let entity = Entity::new("x");
        assert_eq!(entity.comment(), None);
        assert!(entity.attributes().is_empty());

        let commented = Entity::new("x").with_comment("the x coordinate");
        assert_eq!(commented.comment(), Some("the x coordinate"));
    }
}
