//! idlbind CLI entry point.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::debug;

use idlbind_engine::{MixinCollision, MixinOrder};
use idlbind_foundation::Result;
use idlbind_runtime::{GeneratorConfig, OutputFormat, Pipeline, init_tracing, save_to_file, write_model};

/// Generate a binding model from interface definition files.
#[derive(Parser, Debug)]
#[command(name = "idlbind")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Definition files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat unknown extended attributes as errors
    #[arg(long)]
    strict: bool,

    /// Order in which mixins contribute members
    #[arg(long, value_enum)]
    mixin_order: Option<OrderArg>,

    /// What happens when a mixin member collides with an inherited one
    #[arg(long, value_enum)]
    mixin_collision: Option<CollisionArg>,

    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Less log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Declaration,
    Alphabetical,
}

impl From<OrderArg> for MixinOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Declaration => Self::Declaration,
            OrderArg::Alphabetical => Self::Alphabetical,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CollisionArg {
    KeepInherited,
    Shadow,
    Reject,
}

impl From<CollisionArg> for MixinCollision {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::KeepInherited => Self::KeepInherited,
            CollisionArg::Shadow => Self::Shadow,
            CollisionArg::Reject => Self::Reject,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = if cli.quiet {
        -1
    } else {
        i8::try_from(cli.verbose).unwrap_or(i8::MAX)
    };
    init_tracing(verbosity);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31merror: {e}\x1b[0m");
            if let Some(context) = &e.context {
                eprintln!("  {context}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Merges the configuration file with command-line flags, flags winning.
fn configure(cli: &Cli) -> Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(format) = cli.format {
        config = config.with_format(format);
    }
    if cli.strict {
        config = config.with_strict(true);
    }
    if let Some(order) = cli.mixin_order {
        config = config.with_mixin_order(order.into());
    }
    if let Some(collision) = cli.mixin_collision {
        config = config.with_mixin_collision(collision.into());
    }
    debug!(?config, "configured");
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = configure(cli)?;
    let format = config.format;

    let mut pipeline = Pipeline::new(config);
    for file in &cli.files {
        pipeline.add_source(file)?;
    }
    let report = pipeline.report();
    for diagnostic in report.diagnostics.iter() {
        eprintln!("{diagnostic}");
    }
    let output = report.into_result()?;

    match &cli.output {
        Some(path) => save_to_file(&output.model, format, path),
        None => write_model(&output.model, format, io::stdout().lock()),
    }
}
