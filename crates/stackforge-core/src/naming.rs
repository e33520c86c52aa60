//! Identifier case conversion shared by artifact paths and templates
//!
//! Entity names arrive in pascal case by convention (`BlogPost`) but may also be
//! written hyphenated (`blog-post`). All three conversions are total over
//! non-empty input; the schema loader rejects empty entity names.

/// `blog-post` -> `BlogPost`. Already-pascal input is returned unchanged.
pub fn to_pascal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = true;

    for c in s.chars() {
        if c == '-' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// `blog-post` -> `blogPost`
pub fn to_camel(s: &str) -> String {
    let pascal = to_pascal(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => pascal,
    }
}

/// `BlogPost` -> `blog-post`
pub fn to_kebab(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);

    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}
