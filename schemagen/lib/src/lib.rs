//! Schema-driven Rust source generator.
//!
//! A schema is a JSON document describing record types ("objects") and
//! their fields. This crate decodes that document into an object model,
//! normalizes it, renders Rust source for it and emits that source through
//! an optional formatting and line-numbering pipeline.
//!
//! ## Modules
//!
//! - [`entity`] - Named, commented, attributed base shared by every schema element
//! - [`field`] - Standard and constant fields
//! - [`object`] - Record objects and the top-level [`Schema`] document
//! - [`attributes`] - Bag of unrecognized keys kept from the source document
//! - [`naming`] - Exported / unexported name derivation
//! - [`zero_values`] - Registry of default expressions per type name
//! - [`codegen`] - Struct and alias generation
//! - [`writer`] - Text assembly helpers
//! - [`format`] - Pluggable source formatters
//! - [`output`] - Format, number and write generated source
//! - [`errors`] - Error types
//!
//! ## Example Usage
//!
//! ```
//! use schemagen::{EmitOptions, Emitter, Schema, render_schema};
//!
//! let mut schema = Schema::from_json(r#"{
//!     "objects": [{
//!         "name": "symmetric_key",
//!         "fields": [
//!             {"name": "kty", "constant": "oct"},
//!             {"name": "key_id", "json": "kid"}
//!         ]
//!     }]
//! }"#).unwrap();
//! schema.organize();
//!
//! let source = render_schema(&schema).unwrap();
//! let code = Emitter::new(EmitOptions::new().with_format_code(true))
//!     .render(&source)
//!     .unwrap();
//! assert!(code.contains("pub struct SymmetricKey {"));
//! assert!(code.contains("pub fn Kty(&self) -> &'static str"));
//! ```

pub mod attributes;
pub mod codegen;
pub mod decode;
pub mod entity;
pub mod errors;
pub mod field;
pub mod format;
pub mod naming;
pub mod object;
pub mod output;
pub mod writer;
pub mod zero_values;

pub use attributes::Attributes;
pub use codegen::render_schema;
pub use entity::Entity;
pub use errors::{CodeFormatError, CodegenError};
pub use field::{ConstantField, Field, StandardField};
pub use object::{Object, Schema};
pub use output::{EmitOptions, Emitter, write, write_file};
pub use zero_values::{lookup_zero_value, register_zero_value, zero_value};
