use std::process::ExitCode;

use anyhow::Result;
use appimage_assembler::commands::{
    build_command, clean_command, init_config_command, show_config_command,
};
use appimage_assembler::exit_code_for;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Builds the BlackOutPDF AppImage.
///
/// This CLI is a thin wrapper around `appdir-core` (exposed in code as
/// `appdir_core`). Run without arguments it performs a full build in the
/// current directory.
#[derive(Parser, Debug)]
#[command(
    name = "appimage-assembler",
    version,
    about = "Freeze, stage and package BlackOutPDF as an AppImage",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the whole pipeline and produce the AppImage.
    ///
    /// This will:
    /// - Remove build/, dist/, AppDir/, *.spec and any previous artifact.
    /// - Freeze the main script into one binary.
    /// - Stage AppDir with the binary, icon, icons, desktop file and AppRun.
    /// - Download the packaging utility if it is not cached in the root.
    /// - Package AppDir and verify the artifact exists.
    Build {
        /// Build root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Explicit build config (JSON or YAML). Defaults to appimage.json in the root, if any.
        #[arg(long)]
        config: Option<String>,

        /// Emit the build report as JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Remove the artifacts of a previous build.
    Clean {
        /// Build root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Explicit build config (JSON or YAML).
        #[arg(long)]
        config: Option<String>,
    },

    /// Print the resolved build config and layout as JSON.
    ShowConfig {
        /// Build root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Explicit build config (JSON or YAML).
        #[arg(long)]
        config: Option<String>,
    },

    /// Write the default build config to appimage.json in the root.
    InitConfig {
        /// Build root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Overwrite an existing appimage.json.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = exit_code_for(&err);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(command: Option<Command>) -> Result<()> {
    // Default to a full build in the current directory if no command is given.
    match command.unwrap_or(Command::Build { root: ".".to_string(), config: None, json: false }) {
        Command::Build { root, config, json } => {
            build_command(&root, config.as_deref(), json)?;
        }
        Command::Clean { root, config } => clean_command(&root, config.as_deref())?,
        Command::ShowConfig { root, config } => show_config_command(&root, config.as_deref())?,
        Command::InitConfig { root, force } => init_config_command(&root, force)?,
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter =
        EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
