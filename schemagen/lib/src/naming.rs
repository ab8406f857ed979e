//! Case conversion used to derive exported and unexported identifiers.

/// Converts a `snake_case` name to `CamelCase`.
///
/// Splits on `_`, drops empty segments and upper-cases the first character
/// of each segment. The rest of every segment is kept as written, so
/// already-camel names pass through untouched.
///
/// ## Examples
///
/// ```
/// use schemagen::naming::camelize;
///
/// assert_eq!(camelize("key_id"), "KeyId");
/// assert_eq!(camelize("x5t_s256"), "X5tS256");
/// assert_eq!(camelize("keyOps"), "KeyOps");
/// assert_eq!(camelize("ID"), "ID");
/// ```
pub fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for segment in name.split('_').filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Lower-cases the first character of `s`.
///
/// ## Examples
///
/// ```
/// use schemagen::naming::lc_first;
///
/// assert_eq!(lc_first("KeyId"), "keyId");
/// assert_eq!(lc_first(""), "");
/// ```
pub fn lc_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True when upper-casing `s` leaves it unchanged (`"ID"`, `"X509"`).
pub fn is_all_upper(s: &str) -> bool {
    s.to_uppercase() == s
}

/// Derives the exported form of a declared name.
///
/// All-uppercase names are kept verbatim so acronyms survive.
pub fn exported_name(declared: &str) -> String {
    if is_all_upper(declared) {
        declared.to_string()
    } else {
        camelize(declared)
    }
}

/// Derives the unexported form of a declared name.
///
/// An all-uppercase camelized name is lowered entirely (`"ID"` becomes
/// `"id"`), anything else only loses the case of its first character.
pub fn unexported_name(declared: &str) -> String {
    let camel = camelize(declared);
    if is_all_upper(&camel) {
        camel.to_lowercase()
    } else {
        lc_first(&camel)
    }
}
