//! Recording session state machine.
//!
//! # Session lifecycle
//!
//! ```text
//!  ┌───────┐  start_recording()   ┌────────────┐
//!  │ IDLE  │ ───────────────────► │ RECORDING  │
//!  └───────┘                      └─────┬──────┘
//!      ▲                                │
//!      │  first Valid combination       │ key-down events:
//!      │  (finalize, emit accelerator)  │  - modifier press: update set only
//!      │  or cancel_recording()         │  - other press: set/replace key,
//!      │  or on_blur()                  │    validate, maybe finalize
//!      └────────────────────────────────┘
//! ```
//!
//! The held-modifier set is rebuilt from the flags carried on each incoming
//! event rather than maintained by keydown/keyup bookkeeping, so a missed
//! keyup (focus loss mid-chord, OS key repeat) cannot desynchronize the
//! session. The only cross-event state is the pending key token, which a
//! later non-modifier press simply replaces.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::codec::{encode, validate, Accelerator, Verdict};
use crate::key::{KeyToken, Modifier, Platform};

/// A raw key-down event as delivered by the input layer.
///
/// The modifier flags reflect the live keyboard state at the moment of the
/// event and are authoritative; the recorder never infers held modifiers
/// from earlier events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDownEvent {
    /// Logical identity of the pressed key (input-layer naming).
    pub logical_key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyDownEvent {
    /// The platform-neutral modifier set carried by this event's flags.
    pub fn modifier_set(&self) -> HashSet<Modifier> {
        let mut modifiers = HashSet::new();
        if self.ctrl {
            modifiers.insert(Modifier::Control);
        }
        if self.shift {
            modifiers.insert(Modifier::Shift);
        }
        if self.alt {
            modifiers.insert(Modifier::Alt);
        }
        if self.meta {
            modifiers.insert(Modifier::Meta);
        }
        modifiers
    }
}

/// Recording session lifecycle state.
///
/// Finalize and cancel both return to `Idle`; there is no separate terminal
/// state to tear down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
}

/// Outcome of feeding one key-down event to the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// The first structurally valid combination; the session has ended and
    /// the accelerator is ready to hand to the registrar.
    Finalized(Accelerator),
    /// The session continues; the string shows what is currently held so a
    /// live preview can update on every keystroke. May be empty right after
    /// the session starts.
    Preview(String),
    /// No session is active; the event was not consumed and the caller
    /// should let it propagate normally.
    Ignored,
}

/// Owns the recording session and incrementally builds a combination from a
/// stream of key-down events.
///
/// One session exists per recorder instance; all mutation happens
/// synchronously inside [`ComboRecorder::on_key_down`] on the caller's
/// event loop. While a session is active every key-down event is consumed
/// (any return value other than [`Capture::Ignored`] means the caller must
/// suppress the event's default handling).
#[derive(Debug)]
pub struct ComboRecorder {
    platform: Platform,
    state: SessionState,
    held_modifiers: HashSet<Modifier>,
    pending_key: Option<KeyToken>,
}

impl ComboRecorder {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            state: SessionState::Idle,
            held_modifiers: HashSet::new(),
            pending_key: None,
        }
    }

    /// Recorder for the platform this binary was compiled for.
    pub fn for_host() -> Self {
        Self::new(Platform::host())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Begin (or reset) a recording session.
    ///
    /// Idempotent: calling while already recording resets the in-progress
    /// combination rather than creating a second session.
    pub fn start_recording(&mut self) {
        if self.state == SessionState::Recording {
            tracing::debug!("recording already active, resetting session");
        } else {
            tracing::debug!("recording session started");
        }
        self.state = SessionState::Recording;
        self.held_modifiers.clear();
        self.pending_key = None;
    }

    /// Abort the session from any state without emitting a value.
    ///
    /// Safe to call at any time, including from a focus-loss handler.
    pub fn cancel_recording(&mut self) {
        if self.state == SessionState::Recording {
            tracing::debug!("recording session cancelled");
        }
        self.state = SessionState::Idle;
        self.held_modifiers.clear();
        self.pending_key = None;
    }

    /// Focus loss aborts the session exactly like an explicit cancel.
    pub fn on_blur(&mut self) {
        self.cancel_recording();
    }

    /// Feed one key-down event to the active session.
    ///
    /// Returns [`Capture::Ignored`] while idle. Otherwise the event is
    /// consumed: a modifier press updates the held set and previews it, a
    /// non-modifier press sets or replaces the pending key and finalizes the
    /// session as soon as the combination validates. The first valid
    /// combination wins; afterwards the recorder is idle again and consumes
    /// nothing.
    pub fn on_key_down(&mut self, event: &KeyDownEvent) -> Capture {
        if self.state != SessionState::Recording {
            return Capture::Ignored;
        }

        // Authoritative modifier state comes from the event's flags.
        self.held_modifiers = event.modifier_set();

        if let Some(modifier) = Modifier::from_name(&event.logical_key) {
            // Some input layers set the flag for a modifier only on events
            // after the modifier's own keydown; fold the pressed modifier in
            // so the preview reflects it immediately.
            self.held_modifiers.insert(modifier);

            // A modifier press never finalizes, even if a pending key from
            // an earlier event would now form a valid combination; the user
            // completes the chord with a non-modifier press.
            let preview = encode(&self.held_modifiers, self.pending_key.as_ref(), self.platform);
            return Capture::Preview(preview.into_string());
        }

        // A new non-modifier press replaces any earlier choice.
        self.pending_key = Some(KeyToken::from_raw(&event.logical_key));

        match validate(&self.held_modifiers, self.pending_key.as_ref()) {
            Verdict::Valid => {
                let accelerator =
                    encode(&self.held_modifiers, self.pending_key.as_ref(), self.platform);
                tracing::debug!(accelerator = %accelerator, "combination finalized");
                self.state = SessionState::Idle;
                self.held_modifiers.clear();
                self.pending_key = None;
                Capture::Finalized(accelerator)
            }
            Verdict::PendingModifier => {
                let preview =
                    encode(&self.held_modifiers, self.pending_key.as_ref(), self.platform);
                Capture::Preview(preview.into_string())
            }
            Verdict::Rejected { reason } => {
                // Unreachable with a pending key set; keep waiting.
                tracing::warn!(%reason, "unexpected rejection during recording");
                Capture::Preview(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(logical: &str) -> KeyDownEvent {
        KeyDownEvent {
            logical_key: logical.to_string(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        }
    }

    fn key_with(logical: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> KeyDownEvent {
        KeyDownEvent {
            logical_key: logical.to_string(),
            ctrl,
            shift,
            alt,
            meta,
        }
    }

    fn recorder() -> ComboRecorder {
        ComboRecorder::new(Platform::Linux)
    }

    #[test]
    fn test_idle_recorder_ignores_events() {
        let mut rec = recorder();
        assert_eq!(rec.on_key_down(&key("A")), Capture::Ignored);
        assert_eq!(rec.state(), SessionState::Idle);
    }

    #[test]
    fn test_control_space_finalizes() {
        let mut rec = recorder();
        rec.start_recording();

        let preview = rec.on_key_down(&key_with("Control", true, false, false, false));
        assert_eq!(preview, Capture::Preview("Control".to_string()));

        let capture = rec.on_key_down(&key_with(" ", true, false, false, false));
        match capture {
            Capture::Finalized(accel) => assert_eq!(accel.as_str(), "Control+Space"),
            other => panic!("expected finalize, got {:?}", other),
        }
        assert_eq!(rec.state(), SessionState::Idle);
    }

    #[test]
    fn test_shift_letter_finalizes() {
        let mut rec = recorder();
        rec.start_recording();

        let capture = rec.on_key_down(&key_with("a", false, true, false, false));
        match capture {
            Capture::Finalized(accel) => assert_eq!(accel.as_str(), "Shift+A"),
            other => panic!("expected finalize, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_letter_waits_then_blur_cancels() {
        let mut rec = recorder();
        rec.start_recording();

        let pending = rec.on_key_down(&key("a"));
        assert_eq!(pending, Capture::Preview("A".to_string()));
        assert_eq!(rec.state(), SessionState::Recording);

        // A later modifier press alone still does not finalize; the user
        // must press a non-modifier key to complete the chord.
        let preview = rec.on_key_down(&key_with("Control", true, false, false, false));
        assert_eq!(preview, Capture::Preview("Control+A".to_string()));
        assert_eq!(rec.state(), SessionState::Recording);

        rec.on_blur();
        assert_eq!(rec.state(), SessionState::Idle);
        assert_eq!(rec.on_key_down(&key("b")), Capture::Ignored);
    }

    #[test]
    fn test_function_key_finalizes_standalone() {
        let mut rec = recorder();
        rec.start_recording();

        match rec.on_key_down(&key("F5")) {
            Capture::Finalized(accel) => assert_eq!(accel.as_str(), "F5"),
            other => panic!("expected finalize, got {:?}", other),
        }
    }

    #[test]
    fn test_media_key_finalizes_standalone() {
        let mut rec = recorder();
        rec.start_recording();

        match rec.on_key_down(&key("MediaPlayPause")) {
            Capture::Finalized(accel) => assert_eq!(accel.as_str(), "MediaPlayPause"),
            other => panic!("expected finalize, got {:?}", other),
        }
    }

    #[test]
    fn test_modifier_only_presses_never_finalize() {
        let mut rec = recorder();
        rec.start_recording();

        rec.on_key_down(&key_with("Control", true, false, false, false));
        rec.on_key_down(&key_with("Shift", true, true, false, false));
        let preview = rec.on_key_down(&key_with("Meta", true, true, false, true));
        assert_eq!(
            preview,
            Capture::Preview("Control+Shift+Super".to_string())
        );
        assert_eq!(rec.state(), SessionState::Recording);
    }

    #[test]
    fn test_pending_key_replaced_before_finalize() {
        let mut rec = recorder();
        rec.start_recording();

        // Bare key pends; a different bare key replaces it.
        rec.on_key_down(&key("a"));
        let replaced = rec.on_key_down(&key("b"));
        assert_eq!(replaced, Capture::Preview("B".to_string()));

        // Completing with a modifier held finalizes the replacement key.
        match rec.on_key_down(&key_with("c", true, false, false, false)) {
            Capture::Finalized(accel) => assert_eq!(accel.as_str(), "Control+C"),
            other => panic!("expected finalize, got {:?}", other),
        }
    }

    #[test]
    fn test_first_valid_combination_wins() {
        let mut rec = recorder();
        rec.start_recording();

        match rec.on_key_down(&key_with("x", true, false, false, false)) {
            Capture::Finalized(accel) => assert_eq!(accel.as_str(), "Control+X"),
            other => panic!("expected finalize, got {:?}", other),
        }

        // Session ended; further events are not consumed.
        assert_eq!(
            rec.on_key_down(&key_with("y", true, false, false, false)),
            Capture::Ignored
        );
    }

    #[test]
    fn test_start_recording_idempotent() {
        let mut rec = recorder();
        rec.start_recording();
        rec.on_key_down(&key("a"));

        // Restarting clears the pending key, same as a fresh session.
        rec.start_recording();
        assert_eq!(rec.state(), SessionState::Recording);
        let preview = rec.on_key_down(&key_with("Control", true, false, false, false));
        assert_eq!(preview, Capture::Preview("Control".to_string()));

        rec.start_recording();
        rec.start_recording();
        assert_eq!(rec.state(), SessionState::Recording);
    }

    #[test]
    fn test_stale_modifier_state_overwritten_by_flags() {
        let mut rec = recorder();
        rec.start_recording();

        rec.on_key_down(&key_with("Control", true, false, false, false));
        // Next event arrives with no flags set (keyup was missed during
        // focus loss); the live flags win over any remembered state.
        let pending = rec.on_key_down(&key("a"));
        assert_eq!(pending, Capture::Preview("A".to_string()));
        assert_eq!(rec.state(), SessionState::Recording);
    }

    #[test]
    fn test_macos_meta_encodes_as_command() {
        let mut rec = ComboRecorder::new(Platform::MacOs);
        rec.start_recording();

        match rec.on_key_down(&key_with("k", false, false, false, true)) {
            Capture::Finalized(accel) => assert_eq!(accel.as_str(), "Command+K"),
            other => panic!("expected finalize, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_safe_in_any_state() {
        let mut rec = recorder();
        rec.cancel_recording();
        assert_eq!(rec.state(), SessionState::Idle);

        rec.start_recording();
        rec.cancel_recording();
        rec.cancel_recording();
        assert_eq!(rec.state(), SessionState::Idle);
    }

    #[test]
    fn test_key_down_event_deserializes_from_input_json() {
        let event: KeyDownEvent =
            serde_json::from_str(r#"{"logical_key": " ", "ctrl": true}"#).unwrap();
        assert_eq!(event.logical_key, " ");
        assert!(event.ctrl);
        assert!(!event.shift);

        let mut rec = recorder();
        rec.start_recording();
        match rec.on_key_down(&event) {
            Capture::Finalized(accel) => assert_eq!(accel.as_str(), "Control+Space"),
            other => panic!("expected finalize, got {:?}", other),
        }
    }
}
