//! Naming and presentation helpers shared by the document kinds.

/// `"true"` / `"false"`, the form flags take in every document.
pub fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Turn an identifier into words: `MaxWalkSpeed` becomes `Max Walk Speed`.
///
/// With `is_bool`, a leading `b` before an uppercase letter is dropped
/// (`bIsActive` becomes `Is Active`).
pub fn name_to_display_string(name: &str, is_bool: bool) -> String {
    let name = match name.strip_prefix('b') {
        Some(rest) if is_bool && rest.starts_with(|c: char| c.is_ascii_uppercase()) => rest,
        _ => name,
    };
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            continue;
        }
        if i > 0 && !out.ends_with(' ') {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let word_start = c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit());
            let acronym_end =
                c.is_uppercase() && prev.is_uppercase() && next.is_some_and(char::is_lowercase);
            let number_start = c.is_ascii_digit() && !prev.is_ascii_digit();
            if word_start || acronym_end || number_start {
                out.push(' ');
            }
        }
        out.push(c);
    }

    let trimmed = out.trim_end();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display name, falling back to the identifier spelled out as words.
pub fn display_name_or(display_name: &str, name: &str) -> String {
    if display_name.trim().is_empty() {
        name_to_display_string(name, false)
    } else {
        display_name.to_string()
    }
}

/// The description, or `""` when it only repeats the entity's name.
pub fn description_or_empty<'a>(description: &'a str, name: &str) -> &'a str {
    let trimmed = description.trim();
    if trimmed.is_empty() || trimmed == name || trimmed == name_to_display_string(name, false) {
        ""
    } else {
        trimmed
    }
}

/// Short tooltip when one is set, the full description otherwise.
pub fn short_description<'a>(short: &'a str, long: &'a str, name: &str) -> &'a str {
    if short.trim().is_empty() {
        description_or_empty(long, name)
    } else {
        description_or_empty(short, name)
    }
}

/// `"Root > Parent > Self"`.
pub fn type_hierarchy(ancestors: &[String], own: &str) -> String {
    ancestors
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(own))
        .collect::<Vec<_>>()
        .join(" > ")
}

pub fn nativeness(native: bool) -> &'static str {
    if native {
        "C++"
    } else {
        "Blueprint"
    }
}

/// Declared type with its const and reference qualifiers.
pub fn type_signature(type_name: &str, is_const: bool, is_reference: bool) -> String {
    format!(
        "{}{}{}",
        if is_const { "const " } else { "" },
        type_name,
        if is_reference { "&" } else { "" }
    )
}

/// File stem for a document named after a title: spaces become `-`, path
/// separators and reserved characters are dropped.
pub fn file_stem_for_title(title: &str) -> String {
    title
        .trim()
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Cut the `Target is ...` suffix the editor appends to node titles and tooltips.
pub fn strip_target_line(tooltip: &str) -> &str {
    match tooltip.find("Target is ") {
        Some(pos) => tooltip[..pos].trim_end(),
        None => tooltip,
    }
}
