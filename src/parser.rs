use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{PslError, Result};
use crate::idn::{IdnaConverter, IdnaOptions, Uts46Converter};
use crate::rules::{RuleData, EXCEPTION_KEY, WILDCARD_KEY};
use crate::types::ListSection;

/// Section markers of the Public Suffix List text format
/// Format: // ===BEGIN ICANN DOMAINS===
static SECTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^//\s*===(BEGIN|END) (ICANN|PRIVATE) DOMAINS===\s*$")
        .expect("SECTION_MARKER: hardcoded regex is invalid")
});

/// Parse Public Suffix List text into structured rule data.
///
/// Rules outside a BEGIN/END section block are skipped.
pub fn parse_list(text: &str, options: &IdnaOptions) -> Result<RuleData> {
    parse_list_with(text, options, &Uts46Converter)
}

/// Parse Public Suffix List text with a custom IDNA converter.
pub fn parse_list_with(
    text: &str,
    options: &IdnaOptions,
    converter: &dyn IdnaConverter,
) -> Result<RuleData> {
    let mut data = RuleData::new();
    let mut section: Option<ListSection> = None;
    let mut rule_count = 0usize;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with("//") {
            if let Some(captures) = SECTION_MARKER.captures(line) {
                let marked = match &captures[2] {
                    "ICANN" => ListSection::Icann,
                    _ => ListSection::Private,
                };
                section = match &captures[1] {
                    "BEGIN" => Some(marked),
                    _ => None,
                };
            }
            continue;
        }

        let Some(section) = section else {
            tracing::trace!(line = line_num, "skipping rule outside of a section");
            continue;
        };

        // Only the first whitespace-delimited token is the rule
        let token = line.split_whitespace().next().unwrap_or(line);
        let labels = parse_rule(token, line_num, options, converter)?;
        data.add_rule(section, &labels);
        rule_count += 1;
    }

    tracing::debug!(rules = rule_count, "parsed public suffix list");
    Ok(data)
}

/// Parse a Public Suffix List file.
pub fn parse_list_from_file(path: impl AsRef<Path>, options: &IdnaOptions) -> Result<RuleData> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        PslError::file_error(format!(
            "Failed to read list file '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_list(&text, options)
}

/// Parse a single rule into left-to-right labels, keeping the `!` prefix on
/// an exception's leftmost label.
fn parse_rule(
    rule: &str,
    line_num: usize,
    options: &IdnaOptions,
    converter: &dyn IdnaConverter,
) -> Result<Vec<String>> {
    let invalid = |message: String| PslError::invalid_data(format!("line {}: {}", line_num, message));

    let (body, exception) = match rule.strip_prefix(EXCEPTION_KEY) {
        Some(body) => (body, true),
        None => (rule, false),
    };

    let parts: Vec<&str> = body.split('.').collect();
    let mut labels = Vec::with_capacity(parts.len());

    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            return Err(invalid(format!("empty label in rule '{}'", rule)));
        }

        if *part == WILDCARD_KEY {
            if exception && i == 0 {
                return Err(invalid(format!("wildcard exception '{}'", rule)));
            }
            labels.push(WILDCARD_KEY.to_string());
            continue;
        }

        if part.contains(|c: char| c == '*' || c == '!') {
            return Err(invalid(format!("misplaced marker in rule '{}'", rule)));
        }

        let ascii = converter
            .to_ascii(&part.to_lowercase(), options.to_ascii)
            .map_err(|e| invalid(format!("rule '{}': {}", rule, e)))?;
        labels.push(ascii);
    }

    if exception {
        labels[0] = format!("{}{}", EXCEPTION_KEY, labels[0]);
    }

    Ok(labels)
}
