//! Registrar boundary.
//!
//! The engine only produces accelerator strings; binding one as a
//! system-wide shortcut is the registrar's job. Its verdict is passed
//! through to the caller untouched — the engine does not try to predict
//! reserved or already-claimed combinations, and a failed registration does
//! not reopen the recording session.

use serde::{Deserialize, Serialize};

use crate::codec::Accelerator;

/// What the registrar reported back for one registration attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RegistrationOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Attempts to bind an accelerator to a system-wide shortcut.
pub trait Registrar {
    fn register(&mut self, accelerator: &Accelerator) -> RegistrationOutcome;
}

/// Registrar that performs no OS-level binding and always succeeds.
///
/// Used where a real backend is unavailable (tests, the CLI's scripted
/// sessions); keeps the pass-through path exercised end to end.
#[derive(Debug, Default)]
pub struct DryRunRegistrar;

impl Registrar for DryRunRegistrar {
    fn register(&mut self, accelerator: &Accelerator) -> RegistrationOutcome {
        tracing::info!(accelerator = %accelerator, "dry-run registration");
        RegistrationOutcome::success()
    }
}
