//! Keyboard IME - on-screen keyboard core, headless
//!
//! Manages saved key layouts and keyboard appearance settings, and types key
//! sequences through the same path the on-screen keyboard uses.
//!
//! # Usage
//!
//! ```bash
//! # List saved English layouts
//! keyboard-ime layouts list --language en
//!
//! # Swap Q and A on the built-in layout and save it as the new default
//! keyboard-ime layouts edit --swap 1,0:0,0 --save-as "A first" --set-default
//!
//! # Change the key font size
//! keyboard-ime settings set keyboard-font-size 40
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keyboard_ime::cli::{CliResult, LayoutsArgs, SettingsArgs, TypeArgs};

/// Keyboard IME - saved layouts, settings and typing from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage saved keyboard layouts
    Layouts(LayoutsArgs),
    /// Show or change keyboard appearance settings
    Settings(SettingsArgs),
    /// Type keys on a layout and print the resulting text
    Type(TypeArgs),
}

fn run(command: &Command) -> CliResult<()> {
    match command {
        Command::Layouts(args) => args.execute(),
        Command::Settings(args) => args.execute(),
        Command::Type(args) => args.execute(),
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing (stdout is reserved for command output)
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code() as i32);
    }
}
