//! Hotkey capture engine and accelerator codec.
//!
//! This crate turns a live sequence of raw key-down events into a
//! validated, platform-normalized accelerator string suitable for
//! registering a system-wide keyboard shortcut, and decodes stored
//! accelerators back into human-readable labels.
//!
//! Two cooperating pieces:
//!
//! - [`ComboRecorder`] owns the recording session: it consumes key-down
//!   events, tracks the held modifier set and the most recent non-modifier
//!   key, and decides per event whether the session is still pending or has
//!   produced a final combination.
//! - The codec functions ([`encode`], [`validate`], [`display_label`],
//!   [`parse_stored`]) are stateless translations between combinations and
//!   the canonical `+`-joined [`Accelerator`] form.
//!
//! The core performs no I/O and has no suspension points; OS registration
//! happens behind the [`Registrar`] trait, after the engine has emitted a
//! final value.

mod codec;
mod key;
mod recorder;
mod registrar;

pub use codec::{
    display_label, encode, parse_stored, validate, Accelerator, MalformedAccelerator, Verdict,
};
pub use key::{KeyToken, Modifier, Platform, MODIFIER_ORDER};
pub use recorder::{Capture, ComboRecorder, KeyDownEvent, SessionState};
pub use registrar::{DryRunRegistrar, RegistrationOutcome, Registrar};
