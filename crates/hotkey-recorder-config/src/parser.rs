//! KDL settings parser

use std::path::Path;

use crate::error::ConfigError;
use crate::model::*;

/// Parse a settings file from the given path
pub fn parse_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_settings_str(&content)
}

/// Parse settings from a string
pub fn parse_settings_str(content: &str) -> Result<Settings, ConfigError> {
    let doc: kdl::KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
        let offset = e.span.offset();
        let len = e.span.len();
        let span = miette::SourceSpan::from((offset, len));
        ConfigError::ParseError {
            src: content.to_string(),
            span,
            source: e,
        }
    })?;

    let mut settings = Settings::default();

    for node in doc.nodes() {
        match node.name().value() {
            "global" => {
                parse_global(node, &mut settings)?;
            }
            "hotkey" => {
                settings.hotkey = parse_hotkey(node)?;
            }
            name => {
                tracing::warn!("Unknown top-level node: {}", name);
            }
        }
    }

    Ok(settings)
}

fn parse_global(node: &kdl::KdlNode, settings: &mut Settings) -> Result<(), ConfigError> {
    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "log-level" => {
                    if let Some(entry) = child.entries().first() {
                        if let Some(val) = entry.value().as_string() {
                            settings.log_level =
                                val.parse().map_err(|e| ConfigError::Invalid { message: e })?;
                        }
                    }
                }
                "placeholder" => {
                    if let Some(entry) = child.entries().first() {
                        if let Some(val) = entry.value().as_string() {
                            settings.placeholder = val.to_string();
                        }
                    }
                }
                name => {
                    tracing::warn!("Unknown global config option: {}", name);
                }
            }
        }
    }

    Ok(())
}

fn parse_hotkey(node: &kdl::KdlNode) -> Result<Option<String>, ConfigError> {
    let value = node
        .entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| ConfigError::MissingField {
            field: "hotkey value (e.g., `hotkey \"Control+Shift+Space\"`)".to_string(),
        })?;

    // A stored value that no longer matches the token grammar is kept: the
    // display layer degrades to a best-effort label, and the user can
    // re-record. Only warn here.
    if let Err(e) = hotkey_recorder_core::parse_stored(value) {
        tracing::warn!("Stored hotkey does not match the accelerator grammar: {}", e);
    }

    Ok(Some(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_settings() {
        let config = r#"
            global {
                log-level "debug"
                placeholder "press a shortcut"
            }

            hotkey "Control+Shift+Space"
        "#;

        let result = parse_settings_str(config).unwrap();
        assert_eq!(result.log_level, LogLevel::Debug);
        assert_eq!(result.placeholder, "press a shortcut");
        assert_eq!(result.hotkey, Some("Control+Shift+Space".to_string()));
    }

    #[test]
    fn test_defaults_when_empty() {
        let result = parse_settings_str("").unwrap();
        assert_eq!(result, Settings::default());
        assert!(result.hotkey.is_none());
    }

    #[test]
    fn test_hotkey_without_value_errors() {
        let result = parse_settings_str("hotkey");
        match result {
            Err(ConfigError::MissingField { field }) => {
                assert!(field.contains("hotkey value"));
            }
            other => panic!("Expected MissingField error, got: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_stored_hotkey_kept_with_warning() {
        // Display degrades on malformed values; parsing must not block.
        let result = parse_settings_str(r#"hotkey "Control++""#).unwrap();
        assert_eq!(result.hotkey, Some("Control++".to_string()));
    }

    #[test]
    fn test_unknown_nodes_tolerated() {
        let config = r#"
            global {
                theme "dark"
            }
            audio-device "default"
            hotkey "F5"
        "#;

        let result = parse_settings_str(config).unwrap();
        assert_eq!(result.hotkey, Some("F5".to_string()));
    }

    #[test]
    fn test_invalid_log_level_errors() {
        let config = r#"
            global {
                log-level "verbose"
            }
        "#;

        let result = parse_settings_str(config);
        match result {
            Err(ConfigError::Invalid { message }) => {
                assert!(message.contains("verbose"));
            }
            other => panic!("Expected Invalid error, got: {:?}", other),
        }
    }

    #[test]
    fn test_kdl_syntax_error_reports_span() {
        let result = parse_settings_str("hotkey \"unterminated");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
