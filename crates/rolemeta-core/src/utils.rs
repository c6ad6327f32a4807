//! Identifier case conversion for generated names.

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | '.' | ' ')
}

/// Convert a type or role name to PascalCase.
///
/// Separators (`_`, `-`, `.`, space) start a new word. Input that is already
/// PascalCase (starts uppercase, contains lowercase, no separators) is
/// returned unchanged, so `ForEach` stays `ForEach` while `FOR_EACH` becomes
/// `ForEach`.
///
/// # Examples
/// ```
/// use rolemeta_core::utils::to_pascal_case;
/// assert_eq!(to_pascal_case("TYPE_ARGUMENT"), "TypeArgument");
/// assert_eq!(to_pascal_case("code.Invocation"), "CodeInvocation");
/// assert_eq!(to_pascal_case("BodyHolder"), "BodyHolder");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    let starts_uppercase = s.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    let has_lowercase = s.chars().any(|c| c.is_ascii_lowercase());
    if starts_uppercase && has_lowercase && !s.chars().any(is_separator) {
        return s.to_string();
    }

    s.split(is_separator)
        .filter(|word| !word.is_empty())
        .map(|word| {
            // Keep inner capitals of already-cased words ("code.ForEach").
            let keep_case = word.chars().any(|c| c.is_ascii_lowercase());
            let mut chars = word.chars();
            let mut out = String::with_capacity(word.len());
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
            }
            if keep_case {
                out.extend(chars);
            } else {
                out.extend(chars.map(|c| c.to_ascii_lowercase()));
            }
            out
        })
        .collect()
}
