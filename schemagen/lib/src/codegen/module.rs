//! Assembles every object of a schema into one generated source file.

use proc_macro2::TokenStream;
use tracing::{debug, instrument};

use super::{generate_container_alias, generate_object_struct};
use crate::errors::CodegenError;
use crate::object::Schema;
use crate::writer::{Import, SourceWriter};

/// First line of every generated file.
pub const GENERATED_HEADER: &str =
    "//! This code was automatically generated by schemagen. Do not edit manually.";

/// Item tokens for every object, in schema order.
///
/// Returns the tokens and whether any struct (as opposed to a container
/// alias) was generated.
pub fn assemble_schema(schema: &Schema) -> Result<(TokenStream, bool), CodegenError> {
    let mut tokens = TokenStream::new();
    let mut has_structs = false;

    for object in schema.objects() {
        match generate_container_alias(object)? {
            Some(alias) => tokens.extend(alias),
            None => {
                tokens.extend(generate_object_struct(object)?);
                has_structs = true;
            }
        }
    }

    Ok((tokens, has_structs))
}

/// Renders an organized schema as unformatted Rust source.
///
/// A `comment` attribute on the schema document becomes module docs. The
/// result is meant to go through [`Emitter`](crate::output::Emitter) for
/// formatting.
///
/// ## Examples
///
/// ```
/// use schemagen::codegen::render_schema;
/// use schemagen::format::{CodeFormatter, RustFormatter};
/// use schemagen::object::Schema;
///
/// let mut schema = Schema::from_json(r#"{"objects": [{"name": "key_ids", "array_of": "String"}]}"#).unwrap();
/// schema.organize();
///
/// let source = render_schema(&schema).unwrap();
/// let formatted = RustFormatter.format(&source).unwrap();
/// assert!(formatted.contains("pub type KeyIds = Vec<String>;"));
/// ```
#[instrument(level = "debug", skip_all, fields(objects = schema.objects().len()))]
pub fn render_schema(schema: &Schema) -> Result<String, CodegenError> {
    let (tokens, has_structs) = assemble_schema(schema)?;

    let mut out = SourceWriter::new();
    out.r(GENERATED_HEADER);
    if let Some(comment) = schema.attributes().string_value("comment") {
        out.inner_doc(comment);
    }
    if has_structs {
        out.r("\n");
        out.write_imports(&[Import::new("serde::{Deserialize, Serialize}")]);
    }
    if !tokens.is_empty() {
        out.ll(&tokens.to_string());
    }
    out.r("\n");

    debug!(bytes = out.as_str().len(), "rendered schema");
    Ok(out.into_string())
}
