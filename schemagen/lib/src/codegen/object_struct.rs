//! Struct generation for record objects.
//!
//! Standard fields become private struct members. Constant fields become
//! getters returning their literal value. A constant with a string, boolean
//! or number value is also kept as a required member initialized to that
//! value, so it appears in serialized output. `null`, array and object
//! constants are getter-only and do not round-trip through serde.

use proc_macro2::TokenStream;
use quote::quote;
use serde_json::Value;

use super::{doc_lines, ident, parse_type};
use crate::errors::CodegenError;
use crate::field::DEFAULT_TYPE;
use crate::object::Object;
use crate::zero_values::lookup_zero_value;

/// Expression used for required members whose type has no registered zero
/// value.
const FALLBACK_DEFAULT: &str = "Default::default()";

/// Generates the struct for `object`, its `Default` impl and its getters.
///
/// Expects an organized object: field order is taken as-is.
///
/// ## Examples
///
/// ```ignore
/// // Input object:
/// { "name": "oct_key", "fields": [
///     { "name": "kty", "constant": "oct" },
///     { "name": "k", "type": "Vec<u8>", "required": true },
///     { "name": "key_id", "json": "kid" }
/// ]}
///
/// // Generated:
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// #[allow(non_snake_case)]
/// pub struct OctKey {
///     #[serde(rename = "k")]
///     k: Vec<u8>,
///     #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
///     keyId: Option<String>,
///     #[serde(rename = "kty")]
///     kty: String,
/// }
///
/// impl Default for OctKey { ... }
///
/// impl OctKey {
///     pub fn K(&self) -> &Vec<u8> { &self.k }
///     pub fn KeyId(&self) -> Option<&String> { self.keyId.as_ref() }
///     pub fn Kty(&self) -> &'static str { "oct" }
/// }
/// ```
pub fn generate_object_struct(object: &Object) -> Result<TokenStream, CodegenError> {
    let object_name = object.entity().declared_name();
    let struct_name = ident(object_name, object.name(true))?;
    let docs = doc_lines(object.comment());

    let mut members = Vec::new();
    let mut defaults = Vec::new();
    let mut getters = Vec::new();

    for field in object.fields() {
        let declared = field.entity().declared_name();
        let field_docs = doc_lines(field.comment());

        if let Some(constant) = field.as_constant() {
            if let Some((member_ty, init)) = constant_member(constant.value()) {
                let member = ident(declared, field.name(false))?;
                let key = field.external_key();
                members.push(quote! {
                    #(#[doc = #field_docs])*
                    #[serde(rename = #key)]
                    #member: #member_ty,
                });
                defaults.push(quote! { #member: #init, });
            }
            if !field.skip_method() {
                let getter = ident(declared, &field.getter_name(true))?;
                let (ty, value) = constant_literal(constant.value());
                getters.push(quote! {
                    #(#[doc = #field_docs])*
                    pub fn #getter(&self) -> #ty {
                        #value
                    }
                });
            }
            continue;
        }

        let member = ident(declared, field.name(false))?;
        let type_name = field.type_name().unwrap_or(DEFAULT_TYPE);
        let ty = parse_type(declared, type_name)?;
        let key = field.external_key();
        let getter = if field.skip_method() {
            None
        } else {
            Some(ident(declared, &field.getter_name(true))?)
        };

        if field.is_required() {
            let default = default_expr(type_name)?;
            members.push(quote! {
                #(#[doc = #field_docs])*
                #[serde(rename = #key)]
                #member: #ty,
            });
            defaults.push(quote! { #member: #default, });
            if let Some(getter) = getter {
                getters.push(quote! {
                    #(#[doc = #field_docs])*
                    pub fn #getter(&self) -> &#ty {
                        &self.#member
                    }
                });
            }
        } else {
            members.push(quote! {
                #(#[doc = #field_docs])*
                #[serde(rename = #key, default, skip_serializing_if = "Option::is_none")]
                #member: Option<#ty>,
            });
            defaults.push(quote! { #member: None, });
            if let Some(getter) = getter {
                getters.push(quote! {
                    #(#[doc = #field_docs])*
                    pub fn #getter(&self) -> Option<&#ty> {
                        self.#member.as_ref()
                    }
                });
            }
        }
    }

    let getters_impl = if getters.is_empty() {
        quote! {}
    } else {
        quote! {
            #[allow(non_snake_case)]
            impl #struct_name {
                #(#getters)*
            }
        }
    };

    Ok(quote! {
        #(#[doc = #docs])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[allow(non_snake_case)]
        pub struct #struct_name {
            #(#members)*
        }

        impl Default for #struct_name {
            fn default() -> Self {
                Self {
                    #(#defaults)*
                }
            }
        }

        #getters_impl
    })
}

/// Default expression for a required member of type `ty`.
fn default_expr(ty: &str) -> Result<syn::Expr, CodegenError> {
    let value = lookup_zero_value(ty).unwrap_or_else(|| FALLBACK_DEFAULT.to_string());
    syn::parse_str(&value).map_err(|e| CodegenError::InvalidDefault {
        ty: ty.to_string(),
        value,
        reason: e.to_string(),
    })
}

/// Return type and literal for a constant getter.
///
/// Scalars keep their JSON type; `null`, arrays and objects are exposed as
/// their JSON text.
fn constant_literal(value: &Value) -> (TokenStream, TokenStream) {
    match value {
        Value::Bool(b) => (quote!(bool), quote!(#b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (quote!(i64), quote!(#i))
            } else if let Some(u) = n.as_u64() {
                (quote!(u64), quote!(#u))
            } else {
                let f = n.as_f64().unwrap_or_default();
                (quote!(f64), quote!(#f))
            }
        }
        Value::String(s) => (quote!(&'static str), quote!(#s)),
        other => {
            let json = other.to_string();
            (quote!(&'static str), quote!(#json))
        }
    }
}

/// Member type and initializer for a serialized constant, `None` for
/// constants that are getter-only.
fn constant_member(value: &Value) -> Option<(TokenStream, TokenStream)> {
    match value {
        Value::String(s) => Some((quote!(String), quote!(String::from(#s)))),
        Value::Bool(_) | Value::Number(_) => Some(constant_literal(value)),
        _ => None,
    }
}
