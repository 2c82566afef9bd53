//! Warning output at the end of a run.

use bpdoc_core::Warning;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Escape `text` for a TeamCity service message value.
pub fn teamcity_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '|' => out.push_str("||"),
            '\'' => out.push_str("|'"),
            '\n' => out.push_str("|n"),
            '\r' => out.push_str("|r"),
            '[' => out.push_str("|["),
            ']' => out.push_str("|]"),
            _ => out.push(c),
        }
    }
    out
}

pub fn teamcity_message(text: &str) -> String {
    format!("##teamcity[message status='WARNING' text='{}']", teamcity_escape(text))
}

/// Per-kind totals, ordered by kind name.
pub fn summarize(warnings: &[Warning]) -> BTreeMap<&'static str, usize> {
    let mut totals = BTreeMap::new();
    for warning in warnings {
        *totals.entry(warning.kind.as_str()).or_insert(0) += 1;
    }
    totals
}

/// Print every warning to `out`, as TeamCity service messages when asked,
/// followed by a one-line summary.
pub fn write_warnings(out: &mut dyn Write, warnings: &[Warning], loader: &[String], teamcity: bool) -> io::Result<()> {
    let manifest_warnings = loader.iter().map(|m| ("manifest", m.as_str()));
    let run_warnings = warnings.iter().map(|w| (w.kind.as_str(), w.message.as_str()));

    for (kind, message) in manifest_warnings.chain(run_warnings) {
        if teamcity {
            writeln!(out, "{}", teamcity_message(message))?;
        } else {
            writeln!(out, "warning[{}]: {}", kind, message)?;
        }
    }

    let total = warnings.len() + loader.len();
    if total == 0 {
        return Ok(());
    }
    let mut parts: Vec<String> = summarize(warnings)
        .into_iter()
        .map(|(kind, count)| format!("{} {}", count, kind))
        .collect();
    if !loader.is_empty() {
        parts.push(format!("{} manifest", loader.len()));
    }
    writeln!(out, "{} warning(s): {}", total, parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpdoc_core::WarningKind;

    fn warning(kind: WarningKind, message: &str) -> Warning {
        Warning {
            kind,
            message: message.to_string(),
        }
    }

    #[test]
    fn escapes_service_message_characters() {
        assert_eq!(teamcity_escape("a|b'c\nd\re[f]"), "a||b|'c|nd|re|[f|]");
        assert_eq!(teamcity_escape("plain"), "plain");
    }

    #[test]
    fn formats_service_message() {
        assert_eq!(
            teamcity_message("No description for UClass: Foo"),
            "##teamcity[message status='WARNING' text='No description for UClass: Foo']"
        );
    }

    #[test]
    fn plain_output_with_summary() {
        let warnings = vec![
            warning(WarningKind::MissingDescription, "No description for UEnum: EColor"),
            warning(WarningKind::MissingDescription, "No description for UClass: Foo"),
            warning(WarningKind::StaleEntity, "gone"),
        ];
        let mut out = Vec::new();
        write_warnings(&mut out, &warnings, &[], false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("warning[missing-description]: No description for UEnum: EColor\n"));
        assert!(text.ends_with("3 warning(s): 2 missing-description, 1 stale-entity\n"));
    }

    #[test]
    fn teamcity_output_includes_loader_warnings() {
        let mut out = Vec::new();
        write_warnings(&mut out, &[], &["m.json: node N names unknown class [X]".to_string()], true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("##teamcity[message status='WARNING' text='m.json: node N names unknown class |[X|]']\n"));
        assert!(text.ends_with("1 warning(s): 1 manifest\n"));
    }

    #[test]
    fn nothing_written_without_warnings() {
        let mut out = Vec::new();
        write_warnings(&mut out, &[], &[], false).unwrap();
        assert!(out.is_empty());
    }
}
