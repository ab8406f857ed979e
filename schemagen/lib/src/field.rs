//! Field model: standard fields and constant fields.
//!
//! A field record decodes into exactly one of two variants. Records that
//! contain a `constant` key become [`ConstantField`]s, everything else is a
//! [`StandardField`]. The choice is made by probing the raw record before
//! decoding it, since the schema carries no explicit type tag.
//!
//! ## Keys
//!
//! | key               | variant  | meaning                                  |
//! |-------------------|----------|------------------------------------------|
//! | `name`            | both     | declared name                            |
//! | `exported_name`   | both     | override for the exported identifier     |
//! | `unexported_name` | both     | override for the unexported identifier   |
//! | `comment`         | both     | documentation for the generated member   |
//! | `type`            | both     | Rust type, `String` when absent          |
//! | `json`            | both     | external (serialized) key                |
//! | `getter`          | both     | getter method name                       |
//! | `skip_method`     | both     | do not generate a getter                 |
//! | `required`        | both     | member is not optional                   |
//! | `constant`        | constant | fixed value of the field                 |
//!
//! Any other key is kept in the field's [`Attributes`].

use serde::de::{Deserialize, Deserializer, Error as _, MapAccess};
use serde_json::Value;
use serde_json::value::RawValue;
use tracing::trace;

use crate::attributes::Attributes;
use crate::decode::{CONSTANT_KEY, DecodeEntity, EntityVisitor, decode_slot, has_constant_key};
use crate::entity::Entity;
use crate::errors::CodegenError;
use crate::naming::camelize;

/// Type given to standard fields that do not declare one.
pub const DEFAULT_TYPE: &str = "String";

/// A typed field backed by a struct member.
#[derive(Debug, Clone, Default)]
pub struct StandardField {
    entity: Entity,
    ty: Option<String>,
    json: Option<String>,
    getter: Option<String>,
    skip_method: bool,
    required: bool,
}

impl StandardField {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_entity(Entity::new(name))
    }

    pub fn from_entity(entity: Entity) -> Self {
        Self {
            entity,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn with_json(mut self, key: impl Into<String>) -> Self {
        self.json = Some(key.into());
        self
    }

    pub fn with_getter(mut self, getter: impl Into<String>) -> Self {
        self.getter = Some(getter.into());
        self
    }

    pub fn with_skip_method(mut self, skip: bool) -> Self {
        self.skip_method = skip;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Fills in the default type when none was declared.
    pub fn organize(&mut self) {
        if self.ty.as_deref().is_none_or(str::is_empty) {
            self.ty = Some(DEFAULT_TYPE.to_string());
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn name(&self, exported: bool) -> &str {
        self.entity.name(exported)
    }

    /// Declared type, or [`DEFAULT_TYPE`] once organized.
    pub fn type_name(&self) -> Option<&str> {
        self.ty.as_deref()
    }

    /// Key used when the value is serialized: the declared `json` key or
    /// the unexported name.
    pub fn external_key(&self) -> &str {
        match self.json.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => self.entity.name(false),
        }
    }

    /// Getter method name.
    ///
    /// `exported` is accepted for symmetry with [`Entity::name`] but does not
    /// change the result: without an explicit `getter` this is always the
    /// camel-cased declared name.
    pub fn getter_name(&self, _exported: bool) -> String {
        match self.getter.as_deref() {
            Some(getter) if !getter.is_empty() => getter.to_string(),
            _ => camelize(self.entity.declared_name()),
        }
    }

    pub fn skip_method(&self) -> bool {
        self.skip_method
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

impl DecodeEntity for StandardField {
    const EXPECTING: &'static str = "a field object";

    fn attributes_mut(&mut self) -> &mut Attributes {
        self.entity.attributes_mut()
    }

    fn decode_key<'de, A>(&mut self, key: &str, map: &mut A) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>,
    {
        if self.entity.decode_key(key, map)? {
            return Ok(true);
        }

        match key {
            "type" => self.ty = decode_slot(map, key)?,
            "json" => self.json = decode_slot(map, key)?,
            "getter" => self.getter = decode_slot(map, key)?,
            "skip_method" => self.skip_method = decode_slot(map, key)?,
            "required" => self.required = decode_slot(map, key)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl<'de> Deserialize<'de> for StandardField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntityVisitor::<Self>::new())
    }
}

/// A field with a fixed value.
///
/// Constant fields understand every standard key as well, but are always
/// required whatever `required` says.
#[derive(Debug, Clone, Default)]
pub struct ConstantField {
    field: StandardField,
    value: Value,
}

impl ConstantField {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: StandardField::new(name),
            value: value.into(),
        }
    }

    /// Wraps a standard field's settings around a fixed value.
    pub fn from_standard(field: StandardField, value: impl Into<Value>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The standard part of this field.
    pub fn standard(&self) -> &StandardField {
        &self.field
    }

    pub fn organize(&mut self) {
        self.field.organize();
    }

    pub fn is_required(&self) -> bool {
        true
    }
}

impl DecodeEntity for ConstantField {
    const EXPECTING: &'static str = "a constant field object";

    fn attributes_mut(&mut self) -> &mut Attributes {
        self.field.attributes_mut()
    }

    fn decode_key<'de, A>(&mut self, key: &str, map: &mut A) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>,
    {
        if self.field.decode_key(key, map)? {
            return Ok(true);
        }

        if key == CONSTANT_KEY {
            self.value = decode_slot(map, key)?;
            return Ok(true);
        }
        Ok(false)
    }
}

impl<'de> Deserialize<'de> for ConstantField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntityVisitor::<Self>::new())
    }
}

/// A decoded field of either variant.
#[derive(Debug, Clone)]
pub enum Field {
    Standard(StandardField),
    Constant(ConstantField),
}

impl Field {
    /// Decodes a single field record from JSON text.
    ///
    /// ## Examples
    ///
    /// ```
    /// use schemagen::field::Field;
    ///
    /// let field = Field::from_json(r#"{"name": "kty", "constant": "EC"}"#).unwrap();
    /// assert!(field.as_constant().is_some());
    /// assert!(field.is_required());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CodegenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Probes `raw` for the constant discriminator and decodes it into the
    /// matching variant.
    pub(crate) fn from_raw(raw: &RawValue) -> Result<Self, serde_json::Error> {
        if has_constant_key(raw)? {
            trace!("decoding constant field");
            serde_json::from_str(raw.get()).map(Field::Constant)
        } else {
            trace!("decoding standard field");
            serde_json::from_str(raw.get()).map(Field::Standard)
        }
    }

    fn standard(&self) -> &StandardField {
        match self {
            Field::Standard(field) => field,
            Field::Constant(field) => &field.field,
        }
    }

    pub fn organize(&mut self) {
        match self {
            Field::Standard(field) => field.organize(),
            Field::Constant(field) => field.organize(),
        }
    }

    pub fn entity(&self) -> &Entity {
        self.standard().entity()
    }

    pub fn name(&self, exported: bool) -> &str {
        self.standard().name(exported)
    }

    pub fn comment(&self) -> Option<&str> {
        self.entity().comment()
    }

    pub fn attributes(&self) -> &Attributes {
        self.entity().attributes()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.standard().type_name()
    }

    pub fn external_key(&self) -> &str {
        self.standard().external_key()
    }

    pub fn getter_name(&self, exported: bool) -> String {
        self.standard().getter_name(exported)
    }

    pub fn skip_method(&self) -> bool {
        self.standard().skip_method()
    }

    pub fn is_required(&self) -> bool {
        match self {
            Field::Standard(field) => field.is_required(),
            Field::Constant(field) => field.is_required(),
        }
    }

    /// Always `false`, for both variants. Use [`Field::as_constant`] to tell
    /// the variants apart.
    pub fn is_constant(&self) -> bool {
        false
    }

    pub fn as_constant(&self) -> Option<&ConstantField> {
        match self {
            Field::Constant(field) => Some(field),
            Field::Standard(_) => None,
        }
    }

    /// The fixed value of a constant field.
    pub fn value(&self) -> Option<&Value> {
        self.as_constant().map(ConstantField::value)
    }
}

impl From<StandardField> for Field {
    fn from(field: StandardField) -> Self {
        Field::Standard(field)
    }
}

impl From<ConstantField> for Field {
    fn from(field: ConstantField) -> Self {
        Field::Constant(field)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Field::from_raw(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(json: &str) -> Field {
        let mut field = Field::from_json(json).unwrap();
        field.organize();
        field
    }

    #[test]
    fn simple_constant_field() {
        let field = decode(r#"{"name": "Field1", "constant": "x"}"#);
        assert_eq!(field.name(true), "Field1");
        assert_eq!(field.name(false), "field1");
        assert_eq!(field.type_name(), Some("String"));
        assert_eq!(field.value(), Some(&json!("x")));
    }

    #[test]
    fn constant_field_with_name_overrides() {
        let field = decode(
            r#"{"name": "Field1", "exported_name": "Foo", "unexported_name": "bar", "constant": 1}"#,
        );
        assert_eq!(field.name(true), "Foo");
        assert_eq!(field.name(false), "bar");
        assert_eq!(field.type_name(), Some("String"));
    }

    #[test]
    fn constant_field_is_always_required() {
        let field = decode(r#"{"name": "kty", "constant": "EC", "required": false}"#);
        assert!(field.as_constant().is_some());
        assert!(field.is_required());
    }

    #[test]
    fn null_constant_still_selects_constant_variant() {
        let field = decode(r#"{"name": "nothing", "constant": null}"#);
        assert_eq!(field.value(), Some(&Value::Null));
    }

    #[test]
    fn constant_value_may_be_structured() {
        let field = decode(r#"{"name": "ops", "constant": ["sign", "verify"]}"#);
        assert_eq!(field.value(), Some(&json!(["sign", "verify"])));
    }

    #[test]
    fn standard_field_defaults() {
        let field = decode(r#"{"name": "key_id"}"#);
        assert!(field.as_constant().is_none());
        assert_eq!(field.type_name(), Some(DEFAULT_TYPE));
        assert_eq!(field.external_key(), "keyId");
        assert_eq!(field.external_key(), field.name(false));
        assert!(!field.is_required());
        assert!(!field.skip_method());
    }

    #[test]
    fn standard_field_fixed_keys() {
        let field = decode(
            r#"{
                "name": "key_id",
                "type": "Option<u32>",
                "json": "kid",
                "getter": "KID",
                "skip_method": true,
                "required": true,
                "comment": "Key identifier"
            }"#,
        );
        assert_eq!(field.type_name(), Some("Option<u32>"));
        assert_eq!(field.external_key(), "kid");
        assert_eq!(field.getter_name(true), "KID");
        assert!(field.skip_method());
        assert!(field.is_required());
        assert_eq!(field.comment(), Some("Key identifier"));
        assert!(field.attributes().is_empty());
    }

    #[test]
    fn getter_name_ignores_exported_flag() {
        let field = decode(r#"{"name": "key_ops"}"#);
        assert_eq!(field.getter_name(true), "KeyOps");
        assert_eq!(field.getter_name(false), "KeyOps");
    }

    #[test]
    fn is_constant_reports_false_for_both_variants() {
        assert!(!decode(r#"{"name": "a"}"#).is_constant());
        assert!(!decode(r#"{"name": "a", "constant": true}"#).is_constant());
    }

    #[test]
    fn unknown_keys_land_in_attributes() {
        let field = decode(r#"{"name": "x", "hasAccept": true, "accept_type": "Base64"}"#);
        assert_eq!(field.attributes().bool_value("hasAccept"), Some(true));
        assert_eq!(field.attributes().string_value("accept_type"), Some("Base64"));
        assert_eq!(field.attributes().len(), 2);
    }

    #[test]
    fn unknown_keys_on_constant_fields_land_in_attributes() {
        let field = decode(
            r#"{"name": "kty", "constant": "EC", "deprecated": false, "since": {"rfc": 7517}}"#,
        );
        assert!(field.as_constant().is_some());
        assert_eq!(field.attributes().bool_value("deprecated"), Some(false));
        assert_eq!(
            field.attributes().get("since"),
            Some(&json!({"rfc": 7517}))
        );
        assert!(!field.attributes().contains_key("constant"));
        assert_eq!(field.attributes().len(), 2);
    }

    #[test]
    fn null_string_slots_are_unset() {
        let field = decode(r#"{"name": "x", "json": null, "type": null}"#);
        assert_eq!(field.external_key(), "x");
        assert_eq!(field.type_name(), Some(DEFAULT_TYPE));
    }

    #[test]
    fn mismatched_slot_type_is_an_error() {
        let err = Field::from_json(r#"{"name": "x", "required": "yes"}"#).unwrap_err();
        assert!(err.to_string().contains("\"required\""), "{err}");
    }

    #[test]
    fn duplicate_keys_are_an_error() {
        let err = Field::from_json(r#"{"name": "x", "name": "y"}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate key \"name\""), "{err}");
    }

    #[test]
    fn non_object_record_is_an_error() {
        assert!(Field::from_json(r#""name""#).is_err());
        assert!(Field::from_json("[1, 2]").is_err());
    }

    #[test]
    fn standard_field_without_organize_has_no_type() {
        let field = Field::from_json(r#"{"name": "x"}"#).unwrap();
        assert_eq!(field.type_name(), None);
    }

    #[test]
    fn organize_is_idempotent() {
        let mut field = decode(r#"{"name": "x", "type": "u64"}"#);
        field.organize();
        assert_eq!(field.type_name(), Some("u64"));
    }

    #[test]
    fn programmatic_fields() {
        let field: Field = StandardField::new("curve")
            .with_type("Curve")
            .with_json("crv")
            .with_required(true)
            .into();
        assert_eq!(field.name(true), "Curve");
        assert_eq!(field.external_key(), "crv");
        assert!(field.is_required());

        let constant: Field = ConstantField::new("kty", "OKP").into();
        assert_eq!(constant.value(), Some(&json!("OKP")));
        assert!(constant.is_required());
    }
}
