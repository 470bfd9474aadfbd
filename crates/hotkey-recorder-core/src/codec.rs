//! Accelerator codec: stateless translation between combinations and their
//! canonical `+`-joined string form, plus structural validation.
//!
//! The serialized form is the wire format for both persistence and OS
//! registration, so it must stay stable: modifiers in canonical order
//! (`Control, Shift, Alt, Meta`), meta resolved to its platform name, then
//! the key, joined by `+`. Display formatting for end users goes through
//! [`display_label`] and nowhere else.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::{KeyToken, Modifier, Platform, MODIFIER_ORDER};

/// Canonical serialized form of a modifier+key combination.
///
/// Never empty for a finalized combination; a modifiers-only encoding is
/// produced solely for live previews and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accelerator(String);

impl Accelerator {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural validation result for a combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The combination may be finalized and emitted.
    Valid,
    /// A key is present but needs a modifier; the session must keep waiting.
    PendingModifier,
    /// Structurally impossible combination (no key and no modifiers).
    /// OS-level conflicts are not predicted here; the external registrar
    /// reports those after registration is attempted.
    Rejected { reason: String },
}

/// Encode a combination into its canonical serialized form.
///
/// Modifiers are emitted in canonical order with the meta modifier resolved
/// to its platform name. Without a key, the result is a modifiers-only join
/// (empty when no modifiers are held) intended only for live preview
/// display, never for persistence or registration.
pub fn encode(
    modifiers: &HashSet<Modifier>,
    key: Option<&KeyToken>,
    platform: Platform,
) -> Accelerator {
    let mut parts: Vec<&str> = MODIFIER_ORDER
        .iter()
        .copied()
        .filter(|m| modifiers.contains(m))
        .map(|m| m.storage_name(platform))
        .collect();

    if let Some(key) = key {
        parts.push(key.as_str());
    }

    Accelerator(parts.join("+"))
}

/// Validate a combination against the "requires a modifier unless
/// function/media key" rule enforced by OS global-shortcut registration.
pub fn validate(modifiers: &HashSet<Modifier>, key: Option<&KeyToken>) -> Verdict {
    match key {
        None if modifiers.is_empty() => Verdict::Rejected {
            reason: "empty combination".to_string(),
        },
        // Modifiers held but no key chosen yet: keep waiting.
        None => Verdict::PendingModifier,
        Some(key) if key.standalone_capable() => Verdict::Valid,
        Some(_) if !modifiers.is_empty() => Verdict::Valid,
        Some(_) => Verdict::PendingModifier,
    }
}

/// Error for a stored accelerator that does not match the token grammar.
///
/// Only surfaced by [`parse_stored`], which callers use to vet stored
/// values; rendering via [`display_label`] never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed accelerator '{input}': {reason}")]
pub struct MalformedAccelerator {
    pub input: String,
    pub reason: String,
}

impl MalformedAccelerator {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Parse a stored accelerator string back into a combination.
///
/// Accepts the canonical storage names for modifiers (`Control`, `Shift`,
/// `Alt`, and either `Command` or `Super` for the meta key, both mapping
/// back to the neutral [`Modifier::Meta`]). At most one non-modifier token
/// is allowed; duplicates are rejected.
pub fn parse_stored(
    stored: &str,
) -> Result<(HashSet<Modifier>, Option<KeyToken>), MalformedAccelerator> {
    let stored = stored.trim();

    if stored.is_empty() {
        return Err(MalformedAccelerator::new(stored, "empty input"));
    }

    let parts: Vec<&str> = stored.split('+').map(str::trim).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(MalformedAccelerator::new(
            stored,
            "empty component in accelerator string",
        ));
    }

    let mut modifiers = HashSet::new();
    let mut key: Option<KeyToken> = None;

    for part in &parts {
        if let Some(modifier) = Modifier::from_name(part) {
            if !modifiers.insert(modifier) {
                return Err(MalformedAccelerator::new(
                    stored,
                    format!("duplicate modifier: {}", modifier),
                ));
            }
        } else {
            if key.is_some() {
                return Err(MalformedAccelerator::new(
                    stored,
                    format!("multiple non-modifier keys: unexpected '{}'", part),
                ));
            }
            key = Some(KeyToken::from_stored(part));
        }
    }

    Ok((modifiers, key))
}

/// Format a stored accelerator for presentation to an end user.
///
/// Splits on `+`, maps `Control` to `Ctrl` and (off macOS) `Super` to `Win`,
/// leaves the other tokens under their stored name with the first letter
/// capitalized, and joins with `" + "`. The empty string renders as the
/// caller-supplied placeholder. A value that does not match the token
/// grammar degrades to a best-effort rendering of the raw string; this
/// never fails, so a broken settings value can always be shown.
///
/// Note the asymmetry with [`encode`]: a `Super` token reaching a macOS
/// host (a value recorded on another platform) stays `Super` here, since
/// meta naming was already fixed when the value was encoded.
pub fn display_label(stored: &str, placeholder: &str, platform: Platform) -> String {
    if stored.is_empty() {
        return placeholder.to_string();
    }

    let parts: Vec<String> = stored
        .split('+')
        .filter(|p| !p.is_empty())
        .map(|p| display_token(p, platform))
        .collect();

    if parts.is_empty() {
        // Nothing but separators; show the raw value rather than blocking
        // the user on a broken stored setting.
        return stored.to_string();
    }

    parts.join(" + ")
}

fn display_token(token: &str, platform: Platform) -> String {
    match token {
        "Control" => "Ctrl".to_string(),
        "Super" if platform != Platform::MacOs => "Win".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}
