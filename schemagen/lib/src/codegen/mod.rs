//! Rust code generation from organized schema objects.
//!
//! ## Submodules
//!
//! - [`object_struct`] - Generates a struct, its `Default` impl and getters
//! - [`container`] - Generates `Vec` / `BTreeMap` aliases for container objects
//! - [`module`] - Assembles a whole schema into one source file
//!
//! ## Output Format
//!
//! Generators return `proc_macro2::TokenStream`. [`render_schema`] turns the
//! assembled stream into text, which the
//! [emission pipeline](crate::output) then formats and writes.
//!
//! ## Naming
//!
//! | generated item     | name used                          |
//! |--------------------|------------------------------------|
//! | struct / alias     | object `name(true)`                |
//! | struct member      | field `name(false)` (private)      |
//! | serde key          | field `external_key()`             |
//! | getter method      | field `getter_name(true)` (public) |

pub mod container;
pub mod module;
pub mod object_struct;

pub use container::generate_container_alias;
pub use module::{assemble_schema, render_schema};
pub use object_struct::generate_object_struct;

use proc_macro2::{Ident, Span};

use crate::errors::CodegenError;

/// Builds an identifier, falling back to a raw identifier for keywords.
pub(crate) fn ident(entity: &str, name: &str) -> Result<Ident, CodegenError> {
    if let Ok(ident) = syn::parse_str::<Ident>(name) {
        return Ok(ident);
    }

    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !matches!(name, "_" | "self" | "Self" | "super" | "crate");
    if !valid {
        return Err(CodegenError::InvalidIdentifier {
            entity: entity.to_string(),
            name: name.to_string(),
        });
    }

    Ok(Ident::new_raw(name, Span::call_site()))
}

/// Parses a declared type name.
pub(crate) fn parse_type(entity: &str, ty: &str) -> Result<syn::Type, CodegenError> {
    syn::parse_str(ty).map_err(|e| CodegenError::InvalidType {
        entity: entity.to_string(),
        ty: ty.to_string(),
        reason: e.to_string(),
    })
}

/// Splits a comment into `#[doc]` strings, one per line.
pub(crate) fn doc_lines(comment: Option<&str>) -> Vec<String> {
    comment
        .map(|c| c.lines().map(|line| format!(" {}", line.trim_end())).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_accepts_plain_names() {
        assert_eq!(ident("x", "keyId").unwrap().to_string(), "keyId");
        assert_eq!(ident("x", "_private").unwrap().to_string(), "_private");
    }

    #[test]
    fn ident_escapes_keywords() {
        assert_eq!(ident("type", "type").unwrap().to_string(), "r#type");
        assert_eq!(ident("x", "r#match").unwrap().to_string(), "r#match");
    }

    #[test]
    fn ident_rejects_invalid_names() {
        for bad in ["", "key-id", "1st", "self", "_", "x5t#S256"] {
            let err = ident("entity", bad).unwrap_err();
            assert!(
                matches!(err, CodegenError::InvalidIdentifier { ref name, .. } if name == bad),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn parse_type_reports_entity() {
        assert!(parse_type("crv", "Option<Vec<u8>>").is_ok());
        let Err(err) = parse_type("crv", "Vec<") else {
            panic!("`Vec<` should not parse as a type");
        };
        assert!(matches!(err, CodegenError::InvalidType { .. }), "{err}");
        assert!(err.to_string().contains("crv"), "{err}");
    }

    #[test]
    fn doc_lines_prefix_a_space() {
        assert_eq!(doc_lines(Some("one\ntwo  ")), vec![" one", " two"]);
        assert!(doc_lines(None).is_empty());
    }
}
