use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cmdx::output::{handle_output, OutputMode};
use cmdx::{CommandOverrides, CommandRunner, ExecError, OptionItem};

#[derive(Parser, Debug)]
#[command(name = "cmdx")]
#[command(about = "Build and run a command line from flag options")]
struct Args {
    /// Print the command line instead of running it
    #[arg(long)]
    print: bool,

    /// Working directory for the command
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Discard the command's stdio and do not echo the command line
    #[arg(long)]
    quiet: bool,

    /// Do not echo the command line before running it
    #[arg(long)]
    no_print_command: bool,

    /// Ignore .cmdx/<name>.json defaults files
    #[arg(long)]
    no_config: bool,

    /// Read items starting with `{` or `[` as JSON option items
    #[arg(long)]
    json: bool,

    /// Debug logging on stderr
    #[arg(long)]
    verbose: bool,

    /// The program to run
    name: String,

    /// Arguments for the program; with --json, JSON objects/arrays are
    /// flag mappings and sequences
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    items: Vec<String>,
}

impl Args {
    fn overrides(&self) -> CommandOverrides {
        let mut overrides = CommandOverrides::default();
        if let Some(cwd) = &self.cwd {
            overrides = overrides.cwd(cwd.clone());
        }
        if self.quiet {
            overrides = overrides.quiet(true);
        }
        if self.no_print_command {
            overrides = overrides.print_command(false);
        }
        overrides
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_env("CMDX_LOG")
        .or_else(|_| EnvFilter::try_new(if verbose { "cmdx=debug" } else { "warn" }))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

async fn run(args: Args) -> Result<()> {
    let items: Vec<OptionItem> = if args.json {
        args.items.iter().map(|word| OptionItem::parse_word(word)).collect()
    } else {
        args.items.iter().cloned().map(OptionItem::from).collect()
    };

    let mut overrides = CommandOverrides::default();
    if !args.no_config {
        if let Some(file) = CommandOverrides::load(&args.name)? {
            tracing::debug!(name = %args.name, "loaded defaults file");
            overrides = file;
        }
    }
    let overrides = overrides.merge(args.overrides());
    let runner = CommandRunner::with_overrides(args.name.as_str(), &overrides);

    let mode = if args.print {
        OutputMode::Print
    } else {
        OutputMode::Execute
    };

    handle_output(&runner, items, mode).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        if let Some(code) = e.downcast_ref::<ExecError>().and_then(ExecError::exit_code) {
            std::process::exit(code);
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
