//! Type aliases for objects declared with `array_of` / `object_of`.

use proc_macro2::TokenStream;
use quote::quote;
use tracing::debug;

use super::{doc_lines, ident, parse_type};
use crate::errors::CodegenError;
use crate::object::Object;

/// Generates a type alias when `object` is a container, `None` otherwise.
///
/// - `array_of: T` becomes `pub type Name = Vec<T>;`
/// - `object_of: T` becomes `pub type Name = std::collections::BTreeMap<String, T>;`
///
/// When both are set, `array_of` wins.
///
/// ## Examples
///
/// ```
/// use schemagen::codegen::generate_container_alias;
/// use schemagen::object::Object;
///
/// let object = Object::new("key_set").with_array_of("Key");
/// let tokens = generate_container_alias(&object).unwrap().unwrap();
/// assert!(tokens.to_string().starts_with("pub type KeySet ="));
/// ```
pub fn generate_container_alias(object: &Object) -> Result<Option<TokenStream>, CodegenError> {
    let declared = object.entity().declared_name();

    let target = match (object.array_of(), object.object_of()) {
        (Some(element), other) => {
            if let Some(value) = other {
                debug!(
                    object = declared,
                    array_of = element,
                    object_of = value,
                    "both container kinds declared, using array_of"
                );
            }
            let element = parse_type(declared, element)?;
            quote!(Vec<#element>)
        }
        (None, Some(value)) => {
            let value = parse_type(declared, value)?;
            quote!(std::collections::BTreeMap<String, #value>)
        }
        (None, None) => return Ok(None),
    };

    if !object.fields().is_empty() {
        debug!(
            object = declared,
            fields = object.fields().len(),
            "container object fields are not generated"
        );
    }

    let name = ident(declared, object.name(true))?;
    let docs = doc_lines(object.comment());
    Ok(Some(quote! {
        #(#[doc = #docs])*
        pub type #name = #target;
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::StandardField;
    use crate::format::{CodeFormatter, RustFormatter};

    fn render(object: &Object) -> String {
        let tokens = generate_container_alias(object).unwrap().unwrap();
        RustFormatter.format(&tokens.to_string()).unwrap()
    }

    #[test]
    fn plain_objects_are_not_containers() {
        assert!(generate_container_alias(&Object::new("key")).unwrap().is_none());
    }

    #[test]
    fn empty_descriptors_are_ignored() {
        let object = Object::new("key").with_array_of("").with_object_of("");
        assert!(generate_container_alias(&object).unwrap().is_none());
    }

    #[test]
    fn array_alias() {
        let object = Object::from_json(
            r#"{"name": "key_list", "array_of": "Key", "comment": "Keys in a set"}"#,
        )
        .unwrap();
        assert_eq!(
            render(&object),
            "/// Keys in a set\npub type KeyList = Vec<Key>;\n"
        );
    }

    #[test]
    fn map_alias() {
        let object = Object::new("headers").with_object_of("serde_json::Value");
        assert_eq!(
            render(&object),
            "pub type Headers = std::collections::BTreeMap<String, serde_json::Value>;\n"
        );
    }

    #[tracing_test::traced_test]
    #[test]
    fn array_of_wins_over_object_of() {
        let mut object = Object::new("either")
            .with_array_of("u8")
            .with_object_of("String");
        object.add_field(StandardField::new("ignored"));

        assert_eq!(render(&object), "pub type Either = Vec<u8>;\n");
        assert!(logs_contain("using array_of"));
        assert!(logs_contain("container object fields are not generated"));
    }

    #[test]
    fn invalid_element_type() {
        let object = Object::new("broken").with_array_of("Vec<");
        let err = generate_container_alias(&object).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidType { .. }), "{err}");
    }
}
