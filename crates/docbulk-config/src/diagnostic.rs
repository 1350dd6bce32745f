// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Turns Figment extraction errors into [`ConfigError`] diagnostics that point
//! at the offending key in its TOML file and suggest the closest valid key.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a key to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(docbulk::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if any is similar enough.
        suggestion: Option<String>,
        /// Comma-separated valid keys for the section.
        valid_keys: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(docbulk::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(docbulk::config::missing_key),
        help("add `{key} = <value>` to your docbulk.toml")
    )]
    MissingKey { key: String },

    /// A value parsed fine but is out of range or otherwise unusable.
    #[error("validation error: {message}")]
    #[diagnostic(code(docbulk::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(docbulk::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` holds `(path, content)` pairs used to locate unknown keys.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let suggestion = suggest_key(field, expected);
                let (span, src) = locate_unknown_key(&error, field, toml_sources)
                    .map(|(span, src)| (Some(span), Some(src)))
                    .unwrap_or((None, None));
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.to_string(),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: dotted_path(&error),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.clone(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

fn dotted_path(error: &figment::error::Error) -> String {
    error.path.join(".")
}

/// Find the file an unknown key came from and the key's span inside it.
fn locate_unknown_key(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let origin = match error.metadata.as_ref()?.source.as_ref()? {
        figment::Source::File(path) => path.display().to_string(),
        _ => return None,
    };
    let (path, content) = toml_sources.iter().find(|(p, _)| *p == origin)?;
    let offset = find_key_offset(content, &error.path, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(path, content.clone()),
    ))
}

/// Byte offset of `field` within TOML `content`.
///
/// When `path` is non-empty the search starts after the `[section]` header
/// named by its first element. Only matches at the start of a line followed by
/// whitespace or `=` count.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut line_start = start;
    for line in content[start..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        if let Some(rest) = line.trim_start().strip_prefix(field) {
            if rest.starts_with(|c: char| c == ' ' || c == '\t' || c == '=') {
                return Some(line_start + indent);
            }
        }
        line_start += line.len();
    }
    None
}

/// Suggest the valid key closest to `unknown`, if it is similar enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_with(&GraphicalReportHandler::new(), errors));
}

/// Render diagnostics as plain text, without colors or hyperlinks.
pub fn render_to_string(errors: &[ConfigError]) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .with_links(false);
    render_with(&handler, errors)
}

fn render_with(handler: &GraphicalReportHandler, errors: &[ConfigError]) -> String {
    let mut out = String::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => out.push_str(&buf),
            Err(_) => out.push_str(&format!("Error: {error}\n")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_ops_per_batch_for_typo() {
        let valid = &["ops_per_batch"];
        assert_eq!(
            suggest_key("ops_per_bacth", valid),
            Some("ops_per_batch".to_string())
        );
    }

    #[test]
    fn suggests_best_of_several_keys() {
        let valid = &["database_path", "wal_mode", "busy_timeout_ms"];
        assert_eq!(suggest_key("wal_mod", valid), Some("wal_mode".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_key() {
        let valid = &["database_path", "wal_mode", "busy_timeout_ms"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[storage]\nwal_mode = true\n\n[bulk]\nops_per_bacth = 5\n";
        let path = vec!["bulk".to_string()];
        let o = find_key_offset(content, &path, "ops_per_bacth").unwrap();
        assert_eq!(&content[o..o + "ops_per_bacth".len()], "ops_per_bacth");
    }

    #[test]
    fn find_key_offset_ignores_prefix_matches() {
        let content = "[bulk]\nops_per_batch_extra = 1\n";
        let path = vec!["bulk".to_string()];
        assert_eq!(find_key_offset(content, &path, "ops_per_batch"), None);
    }

    #[test]
    fn find_key_offset_missing_section() {
        let content = "[storage]\nwal_mode = true\n";
        let path = vec!["bulk".to_string()];
        assert_eq!(find_key_offset(content, &path, "wal_mode"), None);
    }

    #[test]
    fn renders_unknown_key_with_suggestion() {
        let content = "[bulk]\nops_per_bacth = 10\n";
        let errors = vec![ConfigError::UnknownKey {
            key: "ops_per_bacth".to_string(),
            suggestion: suggest_key("ops_per_bacth", &["ops_per_batch"]),
            valid_keys: "ops_per_batch".to_string(),
            span: Some((7, 13).into()),
            src: Some(NamedSource::new("docbulk.toml", content.to_string())),
        }];

        let rendered = render_to_string(&errors);
        assert!(rendered.contains("unknown configuration key `ops_per_bacth`"), "{rendered}");
        assert!(rendered.contains("did you mean `ops_per_batch`?"), "{rendered}");
        assert!(rendered.contains("not a recognized key"), "{rendered}");
    }

    #[test]
    fn renders_every_error_in_order() {
        let errors = vec![
            ConfigError::Validation {
                message: "first problem".to_string(),
            },
            ConfigError::Other("second problem".to_string()),
        ];

        let rendered = render_to_string(&errors);
        let first = rendered.find("first problem").expect("first rendered");
        let second = rendered.find("second problem").expect("second rendered");
        assert!(first < second);

        // Same output, written to stderr.
        render_errors(&errors);
    }
}
