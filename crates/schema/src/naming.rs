//! Field and collection name casing.

/// Split on `_`, `-`, whitespace and `.` separators, dropping empty tokens.
fn tokens(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

fn is_all_upper(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic()) && !token.chars().any(|c| c.is_lowercase())
}

fn capitalize(token: &str) -> String {
    let lowered;
    let token = if is_all_upper(token) {
        lowered = token.to_lowercase();
        lowered.as_str()
    } else {
        token
    };
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a field name to camelCase.
///
/// `publish_date` → `publishDate`, `seo-title` → `seoTitle`, `URL` → `url`.
/// Names that are already camelCase are returned unchanged.
pub fn to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, token) in tokens(input).enumerate() {
        if i == 0 {
            if is_all_upper(token) {
                out.push_str(&token.to_lowercase());
            } else {
                let mut chars = token.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_lowercase());
                    out.extend(chars);
                }
            }
        } else {
            out.push_str(&capitalize(token));
        }
    }
    out
}

/// Convert a collection slug to PascalCase: `electricity-providers` → `ElectricityProviders`.
pub fn to_pascal_case(input: &str) -> String {
    tokens(input).map(capitalize).collect()
}
