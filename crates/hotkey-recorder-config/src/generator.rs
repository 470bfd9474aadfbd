//! Render settings back to KDL
//!
//! The recorder core never persists anything itself; when the caller wants
//! the captured accelerator saved, this module writes the settings file the
//! parser reads back.

use std::path::Path;

use crate::error::ConfigError;
use crate::model::Settings;

/// Render settings as a KDL document.
///
/// Defaults are written explicitly so a hand-edited file and a generated
/// one look the same; the output round-trips through `parse_settings_str`.
pub fn render_settings(settings: &Settings) -> String {
    let mut out = String::new();

    out.push_str("// hotkey-recorder settings\n");
    out.push_str("global {\n");
    out.push_str(&format!(
        "    log-level \"{}\"\n",
        settings.log_level.as_filter_str()
    ));
    out.push_str(&format!(
        "    placeholder \"{}\"\n",
        settings.placeholder.replace('"', "\\\"")
    ));
    out.push_str("}\n");

    if let Some(hotkey) = &settings.hotkey {
        out.push('\n');
        out.push_str(&format!("hotkey \"{}\"\n", hotkey));
    }

    out
}

/// Write settings to the given path, creating parent directories as needed.
pub fn write_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, render_settings(settings))?;
    tracing::debug!("Wrote settings to {}", path.display());

    Ok(())
}
