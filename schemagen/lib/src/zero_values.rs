//! Process-wide table of default-value expressions keyed by type name.
//!
//! Generated `Default` impls look up the expression for each member's type
//! here. Register additional types during start-up, before generating
//! code; the table is shared by the whole process and entries are never
//! removed.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;

/// Expression returned by [`zero_value`] for unregistered types.
pub const NULL_VALUE: &str = "None";

static ZERO_VALUES: Lazy<RwLock<HashMap<String, String>>> = Lazy::new(|| {
    let mut table: HashMap<String, String> = HashMap::new();

    for int in [
        "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
    ] {
        table.insert(int.to_string(), "0".to_string());
    }
    for float in ["f32", "f64"] {
        table.insert(float.to_string(), "0.0".to_string());
    }

    let seeded = [
        ("String", "String::new()"),
        ("&str", r#""""#),
        ("&'static str", r#""""#),
        ("bool", "false"),
        ("char", r"'\0'"),
        ("Duration", "std::time::Duration::ZERO"),
        ("std::time::Duration", "std::time::Duration::ZERO"),
        ("SystemTime", "std::time::SystemTime::UNIX_EPOCH"),
        ("std::time::SystemTime", "std::time::SystemTime::UNIX_EPOCH"),
    ];
    for (ty, value) in seeded {
        table.insert(ty.to_string(), value.to_string());
    }

    RwLock::new(table)
});

/// Registers (or replaces) the default expression for `ty`.
///
/// ## Examples
///
/// ```
/// use schemagen::zero_values::{register_zero_value, zero_value};
///
/// register_zero_value("Curve", "Curve::P256");
/// assert_eq!(zero_value("Curve"), "Curve::P256");
/// ```
pub fn register_zero_value(ty: impl Into<String>, value: impl Into<String>) {
    ZERO_VALUES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(ty.into(), value.into());
}

/// Returns the registered default expression for `ty`, if any.
pub fn lookup_zero_value(ty: &str) -> Option<String> {
    ZERO_VALUES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(ty)
        .cloned()
}

/// Returns the default expression for `ty`, or [`NULL_VALUE`] if the type
/// was never registered.
pub fn zero_value(ty: &str) -> String {
    lookup_zero_value(ty).unwrap_or_else(|| NULL_VALUE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_types() {
        assert_eq!(zero_value("String"), "String::new()");
        assert_eq!(zero_value("bool"), "false");
        assert_eq!(zero_value("u64"), "0");
        assert_eq!(zero_value("f32"), "0.0");
        assert_eq!(zero_value("std::time::Duration"), "std::time::Duration::ZERO");
        assert_eq!(zero_value("&str"), "\"\"");
    }

    #[test]
    fn unknown_types_fall_back_to_null() {
        assert_eq!(zero_value("zero_values_tests::Unregistered"), NULL_VALUE);
        assert_eq!(lookup_zero_value("zero_values_tests::Unregistered"), None);
    }

    #[test]
    fn registration_is_visible_to_lookups() {
        register_zero_value("zero_values_tests::Algorithm", "Algorithm::Es256");
        assert_eq!(
            lookup_zero_value("zero_values_tests::Algorithm").as_deref(),
            Some("Algorithm::Es256")
        );

        register_zero_value("zero_values_tests::Algorithm", "Algorithm::Rs256");
        assert_eq!(zero_value("zero_values_tests::Algorithm"), "Algorithm::Rs256");
    }
}
