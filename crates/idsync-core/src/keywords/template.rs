//! Bidirectional placeholder substitution
//!
//! Placeholders are written `{{.KEY}}`; whitespace inside the braces is
//! accepted on import. Import is fail-fast: an unknown key or a stray `{{`
//! fails the whole resource.

use std::sync::LazyLock;

use regex::Regex;

use super::KeywordMapping;
use crate::error::{Result, SyncError};

/// Pattern matching one well-formed placeholder and capturing its key
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Longest excerpt quoted when reporting a malformed expression
const MAX_TOKEN_EXCERPT: usize = 40;

/// Render the placeholder token for a key
#[must_use]
pub fn placeholder(key: &str) -> String {
    format!("{{{{.{key}}}}}")
}

/// Applies keyword mappings to resource content
pub struct TemplateEngine;

impl TemplateEngine {
    /// Replace placeholders with literal values (import direction)
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Template` naming `resource` and the offending
    /// token if a placeholder key is not in `mapping` or a `{{` does not
    /// open a well-formed placeholder.
    pub fn fill_placeholders(
        content: &str,
        mapping: &KeywordMapping,
        resource: &str,
    ) -> Result<String> {
        let mut output = String::with_capacity(content.len());
        let mut last = 0;

        for caps in PLACEHOLDER_PATTERN.captures_iter(content) {
            let Some(token) = caps.get(0) else { continue };

            let between = &content[last..token.start()];
            Self::reject_stray_open(between, resource)?;
            output.push_str(between);

            let key = &caps[1];
            let Some(value) = mapping.get(key) else {
                return Err(SyncError::Template {
                    resource: resource.to_string(),
                    token: token.as_str().to_string(),
                });
            };
            output.push_str(value);
            last = token.end();
        }

        let tail = &content[last..];
        Self::reject_stray_open(tail, resource)?;
        output.push_str(tail);

        Ok(output)
    }

    /// Replace literal values with placeholders (export direction)
    ///
    /// Longer literals win over shorter ones that are substrings of them.
    /// Existing placeholders are copied through untouched, so applying this
    /// to already-templated content returns it unchanged. Empty literals
    /// are ignored.
    #[must_use]
    pub fn insert_placeholders(content: &str, mapping: &KeywordMapping) -> String {
        let mut literals: Vec<(&str, &str)> = mapping
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        if literals.is_empty() {
            return content.to_string();
        }
        literals.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));

        let protected: Vec<(usize, usize)> = PLACEHOLDER_PATTERN
            .find_iter(content)
            .map(|m| (m.start(), m.end()))
            .collect();
        let mut next_protected = protected.iter().peekable();

        let mut output = String::with_capacity(content.len());
        let mut pos = 0;

        'scan: while pos < content.len() {
            while let Some(&&(start, end)) = next_protected.peek() {
                if end <= pos {
                    next_protected.next();
                } else if start == pos {
                    output.push_str(&content[start..end]);
                    pos = end;
                    next_protected.next();
                    continue 'scan;
                } else {
                    break;
                }
            }

            // A literal must not run into the next placeholder.
            let limit = next_protected.peek().map_or(content.len(), |&&(start, _)| start);
            let rest = &content[pos..];
            for (key, literal) in &literals {
                if pos + literal.len() <= limit && rest.starts_with(literal) {
                    output.push_str(&placeholder(key));
                    pos += literal.len();
                    continue 'scan;
                }
            }

            let Some(ch) = rest.chars().next() else { break };
            output.push(ch);
            pos += ch.len_utf8();
        }

        output
    }

    fn reject_stray_open(segment: &str, resource: &str) -> Result<()> {
        let Some(start) = segment.find("{{") else {
            return Ok(());
        };

        let rest = &segment[start..];
        let end = rest
            .find("}}")
            .map(|i| i + 2)
            .or_else(|| rest.find('\n'))
            .unwrap_or(rest.len());
        let excerpt: String = rest[..end].chars().take(MAX_TOKEN_EXCERPT).collect();

        Err(SyncError::Template {
            resource: resource.to_string(),
            token: excerpt,
        })
    }
}
