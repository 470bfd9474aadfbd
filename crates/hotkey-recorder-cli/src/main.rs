//! hotkey-recorder CLI
//!
//! Records, inspects, and displays global-hotkey accelerators. The `record`
//! subcommand drives a capture session from JSON key events on stdin, which
//! is how a UI layer (or a test harness) feeds the engine.

use std::io::BufRead;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;
use serde::Deserialize;

use hotkey_recorder_core::{
    display_label, parse_stored, validate, Capture, ComboRecorder, DryRunRegistrar, KeyDownEvent,
    Platform, Registrar, SessionState, Verdict,
};

#[derive(Parser, Debug)]
#[command(name = "hotkey-recorder")]
#[command(about = "Global hotkey capture and accelerator tool")]
#[command(version)]
struct Cli {
    /// Path to settings file
    #[arg(short, long, default_value = "~/.config/hotkey-recorder/settings.kdl")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the settings file
    Validate,

    /// Show the saved hotkey as a human-readable label
    Show,

    /// Check one accelerator string and print its label
    Inspect {
        /// Accelerator string, e.g. "Control+Shift+Space"
        accelerator: String,
    },

    /// Record a hotkey from JSON key events on stdin
    Record {
        /// Persist the captured accelerator to the settings file
        #[arg(short, long)]
        save: bool,
    },
}

/// One line of the `record` subcommand's stdin protocol.
///
/// Key events carry the same fields as the input boundary delivers them;
/// `blur` cancels the session the way focus loss does in a UI.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum InputSignal {
    KeyDown(KeyDownEvent),
    Blur,
}

fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Expand tilde in config path
    let config_path: PathBuf = shellexpand::tilde(&cli.config).into_owned().into();

    match cli.command {
        Commands::Validate => cmd_validate(&config_path),
        Commands::Show => cmd_show(&config_path),
        Commands::Inspect { accelerator } => cmd_inspect(&accelerator),
        Commands::Record { save } => cmd_record(&config_path, save),
    }
}

fn cmd_validate(config_path: &PathBuf) -> miette::Result<()> {
    println!("Validating settings: {}", config_path.display());

    match hotkey_recorder_config::parse_settings(config_path) {
        Ok(settings) => {
            println!("Settings are valid!");
            match &settings.hotkey {
                Some(hotkey) => println!("  Hotkey: {}", hotkey),
                None => println!("  Hotkey: <not set>"),
            }
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn cmd_show(config_path: &PathBuf) -> miette::Result<()> {
    let settings =
        hotkey_recorder_config::parse_settings(config_path).map_err(|e| miette::miette!("{}", e))?;

    let stored = settings.hotkey.as_deref().unwrap_or("");
    println!(
        "{}",
        display_label(stored, &settings.placeholder, Platform::host())
    );

    Ok(())
}

fn cmd_inspect(accelerator: &str) -> miette::Result<()> {
    let (modifiers, key) = parse_stored(accelerator).map_err(|e| miette::miette!("{}", e))?;

    match validate(&modifiers, key.as_ref()) {
        Verdict::Valid => {
            println!("Valid accelerator");
        }
        Verdict::PendingModifier => {
            println!("Incomplete: this combination needs a modifier (or a function/media key)");
        }
        Verdict::Rejected { reason } => {
            return Err(miette::miette!("Rejected: {}", reason));
        }
    }

    println!(
        "  Label: {}",
        display_label(accelerator, "<empty>", Platform::host())
    );

    Ok(())
}

fn cmd_record(config_path: &PathBuf, save: bool) -> miette::Result<()> {
    println!("Recording; feed JSON events on stdin, e.g.");
    println!(r#"  {{"type": "key-down", "logical_key": " ", "ctrl": true}}"#);

    let mut recorder = ComboRecorder::for_host();
    recorder.start_recording();

    let stdin = std::io::stdin();
    let mut captured = None;

    for line in stdin.lock().lines() {
        let line = line.into_diagnostic()?;
        if line.trim().is_empty() {
            continue;
        }

        let signal: InputSignal = serde_json::from_str(&line)
            .map_err(|e| miette::miette!("bad input line '{}': {}", line, e))?;

        match signal {
            InputSignal::KeyDown(event) => match recorder.on_key_down(&event) {
                Capture::Finalized(accelerator) => {
                    captured = Some(accelerator);
                    break;
                }
                Capture::Preview(preview) if !preview.is_empty() => {
                    println!("  ... {}", preview);
                }
                Capture::Preview(_) | Capture::Ignored => {}
            },
            InputSignal::Blur => {
                recorder.on_blur();
                break;
            }
        }
    }

    let Some(accelerator) = captured else {
        // End of input or blur without a valid combination.
        recorder.cancel_recording();
        println!("Recording cancelled; nothing captured");
        return Ok(());
    };
    debug_assert_eq!(recorder.state(), SessionState::Idle);

    println!("Captured: {}", accelerator);
    println!(
        "  Label: {}",
        display_label(accelerator.as_str(), "<empty>", Platform::host())
    );

    // The registrar's verdict is forwarded as-is; a failure here does not
    // reopen the session.
    let outcome = DryRunRegistrar.register(&accelerator);
    if outcome.success {
        println!("Registration: ok");
    } else {
        match &outcome.message {
            Some(message) => println!("Registration failed: {}", message),
            None => println!("Registration failed"),
        }
    }

    if save {
        let mut settings = match hotkey_recorder_config::parse_settings(config_path) {
            Ok(settings) => settings,
            Err(hotkey_recorder_config::ConfigError::Io(_)) => {
                hotkey_recorder_config::Settings::default()
            }
            Err(e) => return Err(miette::miette!("{}", e)),
        };
        settings.hotkey = Some(accelerator.into_string());
        hotkey_recorder_config::write_settings(config_path, &settings)
            .map_err(|e| miette::miette!("{}", e))?;
        println!("Saved to {}", config_path.display());
    }

    Ok(())
}
