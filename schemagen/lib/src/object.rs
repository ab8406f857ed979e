//! Object model and the top-level schema document.
//!
//! ```json
//! {
//!   "objects": [
//!     {
//!       "name": "ec_private_key",
//!       "comment": "An EC private key",
//!       "fields": [
//!         { "name": "kty", "constant": "EC" },
//!         { "name": "d", "type": "Vec<u8>", "required": true },
//!         { "name": "crv", "type": "Curve" }
//!       ]
//!     },
//!     { "name": "key_set", "array_of": "EcPrivateKey" }
//!   ]
//! }
//! ```

use std::io::Read;

use serde::de::{Deserialize, Deserializer, Error as _, MapAccess};
use serde_json::value::RawValue;
use tracing::debug;

use crate::attributes::Attributes;
use crate::decode::{DecodeEntity, EntityVisitor, decode_slot};
use crate::entity::Entity;
use crate::errors::CodegenError;
use crate::field::Field;

/// A named aggregate of fields.
///
/// When `array_of` or `object_of` is set the object describes a container
/// of that type instead of a record; the strings are opaque type names.
#[derive(Debug, Clone, Default)]
pub struct Object {
    entity: Entity,
    fields: Vec<Field>,
    array_of: Option<String>,
    object_of: Option<String>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_entity(Entity::new(name))
    }

    pub fn from_entity(entity: Entity) -> Self {
        Self {
            entity,
            ..Self::default()
        }
    }

    pub fn with_array_of(mut self, ty: impl Into<String>) -> Self {
        self.array_of = Some(ty.into());
        self
    }

    pub fn with_object_of(mut self, ty: impl Into<String>) -> Self {
        self.object_of = Some(ty.into());
        self
    }

    /// Decodes a single object definition from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CodegenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Appends a field after the existing ones.
    pub fn add_field(&mut self, field: impl Into<Field>) {
        self.fields.push(field.into());
    }

    /// Organizes every field and sorts them by exported name.
    ///
    /// The sort is stable, so calling this again on an organized object
    /// leaves it unchanged.
    pub fn organize(&mut self) {
        for field in &mut self.fields {
            field.organize();
        }
        self.fields.sort_by(|a, b| a.name(true).cmp(b.name(true)));
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn name(&self, exported: bool) -> &str {
        self.entity.name(exported)
    }

    pub fn comment(&self) -> Option<&str> {
        self.entity.comment()
    }

    pub fn attributes(&self) -> &Attributes {
        self.entity.attributes()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn array_of(&self) -> Option<&str> {
        self.array_of.as_deref().filter(|s| !s.is_empty())
    }

    pub fn object_of(&self) -> Option<&str> {
        self.object_of.as_deref().filter(|s| !s.is_empty())
    }
}

impl DecodeEntity for Object {
    const EXPECTING: &'static str = "an object definition";

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
            "array_of" => self.array_of = decode_slot(map, key)?,
            "object_of" => self.object_of = decode_slot(map, key)?,
            "fields" => {
                let records: Option<Vec<Box<RawValue>>> = decode_slot(map, key)?;
                let records = records.unwrap_or_default();

                let mut fields = Vec::with_capacity(records.len());
                for (idx, raw) in records.iter().enumerate() {
                    let field = Field::from_raw(raw).map_err(|e| {
                        A::Error::custom(format_args!("failed to decode field {}: {e}", idx + 1))
                    })?;
                    fields.push(field);
                }

                debug!(object = %self.entity.declared_name(), fields = fields.len(), "decoded fields");
                self.fields = fields;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntityVisitor::<Self>::new())
    }
}

/// The top-level schema document: a list of objects.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    objects: Vec<Object>,
    attributes: Attributes,
}

impl Schema {
    pub fn new(objects: Vec<Object>) -> Self {
        Self {
            objects,
            attributes: Attributes::default(),
        }
    }

    /// Decodes a schema document from JSON text.
    ///
    /// ## Examples
    ///
    /// ```
    /// use schemagen::object::Schema;
    ///
    /// let mut schema = Schema::from_json(r#"{
    ///     "package": "jwk",
    ///     "objects": [{"name": "key", "fields": [{"name": "kid"}, {"name": "alg"}]}]
    /// }"#).unwrap();
    /// schema.organize();
    ///
    /// let names: Vec<_> = schema.objects()[0].fields().iter().map(|f| f.name(true)).collect();
    /// assert_eq!(names, ["Alg", "Kid"]);
    /// assert_eq!(schema.attributes().string_value("package"), Some("jwk"));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CodegenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decodes a schema document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CodegenError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Organizes every object, keeping document order between objects.
    pub fn organize(&mut self) {
        for object in &mut self.objects {
            object.organize();
        }
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl DecodeEntity for Schema {
    const EXPECTING: &'static str = "a schema document";

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    fn decode_key<'de, A>(&mut self, key: &str, map: &mut A) -> Result<bool, A::Error>
    where
        A: MapAccess<'de>,
    {
        if key != "objects" {
            return Ok(false);
        }
        let objects: Option<Vec<Object>> = decode_slot(map, key)?;
        self.objects = objects.unwrap_or_default();
        debug!(objects = self.objects.len(), "decoded schema");
        Ok(true)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntityVisitor::<Self>::new())
    }
}
