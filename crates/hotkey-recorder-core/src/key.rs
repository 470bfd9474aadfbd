//! Key and modifier model.
//!
//! Modifiers are normalized to a single platform-neutral representation;
//! the meta key resolves to its per-platform name (`Command` / `Super`)
//! only when an accelerator is encoded.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized modifier key representation.
///
/// Left and right variants are combined into a single modifier type, and the
/// platform-dependent meta key is stored as the neutral [`Modifier::Meta`]
/// token. The declaration order is the canonical serialization order
/// (`Control, Shift, Alt, Meta`), which the derived `Ord` preserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    /// Control key (left or right)
    Control,
    /// Shift key (left or right)
    Shift,
    /// Alt key (left or right)
    Alt,
    /// Platform meta key: Command on macOS, Super/Win elsewhere
    Meta,
}

/// Canonical modifier serialization order.
pub const MODIFIER_ORDER: [Modifier; 4] = [
    Modifier::Control,
    Modifier::Shift,
    Modifier::Alt,
    Modifier::Meta,
];

impl Modifier {
    /// Parse a modifier name string (case-insensitive).
    ///
    /// Recognized names:
    /// - Control: "ctrl", "control", "controlleft", "controlright"
    /// - Shift: "shift", "shiftleft", "shiftright"
    /// - Alt: "alt", "altgraph", "option"
    /// - Meta: "meta", "super", "command", "cmd", "win", "windows", "os"
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "CTRL" | "CONTROL" | "CONTROLLEFT" | "CONTROLRIGHT" => Some(Modifier::Control),
            "SHIFT" | "SHIFTLEFT" | "SHIFTRIGHT" => Some(Modifier::Shift),
            "ALT" | "ALTGRAPH" | "OPTION" => Some(Modifier::Alt),
            "META" | "SUPER" | "COMMAND" | "CMD" | "WIN" | "WINDOWS" | "OS" => Some(Modifier::Meta),
            _ => None,
        }
    }

    /// Storage/display name for this modifier on the given platform.
    ///
    /// This is the only place where [`Modifier::Meta`] is resolved to a
    /// concrete name; everything upstream stores the neutral token.
    pub fn storage_name(self, platform: Platform) -> &'static str {
        match self {
            Modifier::Control => "Control",
            Modifier::Shift => "Shift",
            Modifier::Alt => "Alt",
            Modifier::Meta => platform.meta_name(),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Control => write!(f, "Control"),
            Modifier::Shift => write!(f, "Shift"),
            Modifier::Alt => write!(f, "Alt"),
            Modifier::Meta => write!(f, "Meta"),
        }
    }
}

/// Host platform, used to resolve the meta modifier name at encode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Name used for the meta modifier when encoding an accelerator.
    pub fn meta_name(self) -> &'static str {
        match self {
            Platform::MacOs => "Command",
            Platform::Windows | Platform::Linux => "Super",
        }
    }
}

/// Recognized media key names, in canonical casing.
const MEDIA_KEYS: [&str; 7] = [
    "MediaPlayPause",
    "MediaNextTrack",
    "MediaPreviousTrack",
    "MediaStop",
    "VolumeUp",
    "VolumeDown",
    "VolumeMute",
];

/// The normalized identity of a non-modifier key.
///
/// Holds one of: an uppercased single printable character, a named symbol
/// (`Space`, `Up`, `Down`, `Left`, `Right`), a function key (`F1`..`F24`),
/// a recognized media key, or a verbatim fallback for anything else the
/// input layer delivers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyToken(String);

impl KeyToken {
    /// Normalize a raw logical key name from the input layer.
    ///
    /// - whitespace (including the literal space character) -> `Space`
    /// - arrow key names (`ArrowUp` etc.) -> `Up`/`Down`/`Left`/`Right`
    /// - a single printable character -> uppercased
    /// - `F1`..`F24` and recognized media keys -> canonical casing
    /// - anything else passes through verbatim as a best-effort fallback
    pub fn from_raw(raw: &str) -> Self {
        if raw.chars().all(char::is_whitespace) {
            return KeyToken("Space".to_string());
        }

        let upper = raw.to_uppercase();
        match upper.as_str() {
            "SPACE" | "SPACEBAR" => return KeyToken("Space".to_string()),
            "ARROWUP" | "UP" => return KeyToken("Up".to_string()),
            "ARROWDOWN" | "DOWN" => return KeyToken("Down".to_string()),
            "ARROWLEFT" | "LEFT" => return KeyToken("Left".to_string()),
            "ARROWRIGHT" | "RIGHT" => return KeyToken("Right".to_string()),
            _ => {}
        }

        let mut chars = raw.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if !ch.is_control() {
                return KeyToken(ch.to_uppercase().to_string());
            }
        }

        if let Some(n) = function_key_number(&upper) {
            return KeyToken(format!("F{}", n));
        }

        if let Some(media) = MEDIA_KEYS.iter().find(|m| m.to_uppercase() == upper) {
            return KeyToken((*media).to_string());
        }

        KeyToken(raw.to_string())
    }

    /// Construct from an already-normalized token, e.g. when re-reading a
    /// stored accelerator. No mapping is applied.
    pub fn from_stored(token: &str) -> Self {
        KeyToken(token.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `F1`..`F24`
    pub fn is_function_key(&self) -> bool {
        function_key_number(&self.0.to_uppercase()).is_some()
    }

    /// One of the recognized media key names.
    pub fn is_media_key(&self) -> bool {
        MEDIA_KEYS.contains(&self.0.as_str())
    }

    /// Whether this key may form a global shortcut with no modifiers held.
    pub fn standalone_capable(&self) -> bool {
        self.is_function_key() || self.is_media_key()
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse `F<n>` with n in 1..=24, rejecting leading zeros.
fn function_key_number(upper: &str) -> Option<u8> {
    let digits = upper.strip_prefix('F')?;
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u8>() {
        Ok(n) if (1..=24).contains(&n) => Some(n),
        _ => None,
    }
}
