// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use docx_checkbox_fix::app_config::{self, Config};
use docx_checkbox_fix::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for fix-checkbox
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct FixArgs {
    /// Word document to fix (defaults to src/templates/certificate-template.docx)
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Configuration file path (fix-checkbox.json is used when present)
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Report what would change without writing any file
    #[arg(short = 'n', long)]
    dry_run: bool,
}

/// fix-checkbox - uncheck the "geeignete Person" box of a Word template
///
/// Replaces checked checkbox glyphs (☑ ✓ ✔) with ☐ in paragraphs mentioning
/// "geeignete Person", after writing a backup next to the document.
#[derive(Parser, Debug)]
#[command(name = "fix-checkbox")]
#[command(version)]
#[command(about = "Uncheck text checkboxes in a Word template")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "fix-checkbox scans a .docx document for paragraphs containing \"geeignete Person\" or \"geeignete Stelle\" and replaces checked checkbox glyphs with ☐ where the paragraph mentions \"geeignete Person\".

EXAMPLES:
    fix-checkbox                                 # Fix src/templates/certificate-template.docx
    fix-checkbox form.docx                       # Fix another document
    fix-checkbox -n form.docx                    # Show what would change
    fix-checkbox --log-level debug form.docx     # Verbose diagnostics on stderr
    fix-checkbox completions bash > fix.bash     # Generate bash completions

BACKUP:
    Before overwriting, the original is copied to <name>.backup.docx.
    Nothing is written when no checkbox needs to change.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    fix: FixArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    // The logger accepts everything; the effective level is set through set_max_level
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(app_config::LogLevel::default().to_level_filter());

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "fix-checkbox", &mut std::io::stdout());
        return;
    }

    if let Err(e) = run_fix(cli.fix) {
        debug!("{:?}", e);
        println!("\n❌ Error: {:#}", e);
        println!("\nMake sure the file exists and is a valid .docx (Office Open XML) document.");
        std::process::exit(1);
    }
}

fn run_fix(options: FixArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load(options.config_path.as_deref())
        .context("Failed to load configuration")?;

    // Override config with CLI options if provided
    if let Some(input_path) = options.input_path {
        config.template_path = input_path;
    }

    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?.with_dry_run(options.dry_run);
    info!("Using document {:?}", controller.template_path());

    let outcome = controller.run()?;

    debug!(
        "Finished with {} change(s), backup: {:?}",
        outcome.changes(),
        outcome.backup_path
    );

    Ok(())
}
