//! Axiom mining from entity markdown.
//!
//! Two bounded line grammars are applied independently and their results
//! concatenated, callouts first:
//!
//! - **Callout**: `> [!TAG] text`. The description runs until the next
//!   callout, a blank line, a heading, or end of input. Quoted continuation
//!   lines lose their `>` marker and are joined with a single space; unquoted
//!   ones keep their line break.
//! - **Numbered subsection**: `### <major>.<minor>. <Title>`. The body runs
//!   until the next heading of any level, or end of input.
//!
//! Extraction never deduplicates.

use std::sync::LazyLock;

use regex::Regex;

use ontosync_core::{AxiomRecord, AxiomSource};

/// Record type assigned to numbered subsections.
pub const BUSINESS_RULE: &str = "BUSINESS_RULE";

static RE_CALLOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*>\s*\[!([^\]]+)\]\s*(.*)$").unwrap());

static RE_SUBSECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s+\d+\.\d+\.\s+(.+?)\s*$").unwrap());

fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Extract all axioms from `content`, callouts first, each group in document order.
pub fn extract_axioms(content: &str) -> Vec<AxiomRecord> {
    let lines: Vec<&str> = content.lines().collect();
    let mut axioms = extract_callouts(&lines);
    axioms.extend(extract_subsections(&lines));
    axioms
}

fn extract_callouts(lines: &[&str]) -> Vec<AxiomRecord> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let Some(caps) = RE_CALLOUT.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let kind = caps[1].trim().to_string();
        let mut description = caps[2].trim().to_string();
        i += 1;
        while i < lines.len() {
            let line = lines[i];
            if is_blank(line) || is_heading(line) || RE_CALLOUT.is_match(line) {
                break;
            }
            let trimmed = line.trim_start();
            let (text, separator) = match trimmed.strip_prefix('>') {
                Some(quoted) => (quoted.trim(), " "),
                None => (trimmed.trim_end(), "\n"),
            };
            // A bare `>` separates quote paragraphs; it ends the callout like a blank line.
            if text.is_empty() {
                break;
            }
            if !description.is_empty() {
                description.push_str(separator);
            }
            description.push_str(text);
            i += 1;
        }
        out.push(AxiomRecord {
            kind,
            title: None,
            description,
            source: AxiomSource::Callout,
        });
    }
    out
}

fn extract_subsections(lines: &[&str]) -> Vec<AxiomRecord> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let Some(caps) = RE_SUBSECTION.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let title = caps[1].trim().to_string();
        i += 1;
        let start = i;
        while i < lines.len() && !is_heading(lines[i]) {
            i += 1;
        }
        let description = lines[start..i].join("\n").trim().to_string();
        out.push(AxiomRecord {
            kind: BUSINESS_RULE.to_string(),
            title: Some(title),
            description,
            source: AxiomSource::Section,
        });
    }
    out
}

#[cfg(test)]
mod tests;
