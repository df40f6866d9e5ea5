#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use draftboard_core::config::resolve_config;
use output::{CliError, OutputMode, render_error};
use std::env;
use std::path::Path;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dboard: tiered fantasy basketball draft board",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format. Overrides `--json`, `FORMAT` and the user config.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize a draft board",
        after_help = "EXAMPLES:\n    # Local sqlite board\n    dboard init\n\n    # Talk to a running board server\n    dboard init --backend http --url http://127.0.0.1:5000"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Import players from a JSON projection sheet",
        after_help = "EXAMPLES:\n    dboard import players.json\n    dboard import players.json --replace"
    )]
    Import(cmd::import::ImportArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the board",
        after_help = "EXAMPLES:\n    dboard show\n    dboard show --column C --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(next_help_heading = "Read", about = "List the tiers of one column")]
    Tiers(cmd::tier::TiersArgs),

    #[command(next_help_heading = "Draft", about = "Mark a player as drafted")]
    Draft(cmd::draft::DraftArgs),

    #[command(next_help_heading = "Draft", about = "Mark a player as available again")]
    Undraft(cmd::draft::DraftArgs),

    #[command(next_help_heading = "Order", about = "Move a player one slot up")]
    Up(cmd::order::MoveArgs),

    #[command(next_help_heading = "Order", about = "Move a player one slot down")]
    Down(cmd::order::MoveArgs),

    #[command(
        next_help_heading = "Order",
        about = "Set the full order of a column",
        after_help = "EXAMPLES:\n    # Every guard id, top first\n    dboard reorder G 12 4 7 3"
    )]
    Reorder(cmd::order::ReorderArgs),

    #[command(
        next_help_heading = "Order",
        about = "Drag a player to a row of its column",
        after_help = "EXAMPLES:\n    # Drop player 7 on top of the second row\n    dboard drag 7 --to-row 1\n\n    # Releasing over another column is ignored\n    dboard drag 7 --to-row 0 --over C"
    )]
    Drag(cmd::drag::DragArgs),

    #[command(
        next_help_heading = "Order",
        about = "Move a player to another position column"
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(next_help_heading = "Tiers", about = "Add or remove tier markers")]
    Tier {
        #[command(subcommand)]
        command: cmd::tier::TierCommand,
    },

    #[command(about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DRAFTBOARD_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "draftboard_core=debug,draftboard_cli=debug,info"
        } else {
            "draftboard_core=info,draftboard_cli=info,warn"
        })
    });

    let format = env::var("DRAFTBOARD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn output_mode(cli: &Cli, project_root: &Path) -> OutputMode {
    if let Some(mode) = cli.format {
        return mode;
    }
    match resolve_config(project_root, cli.json) {
        Ok(effective) => OutputMode::from_resolved(&effective.resolved_output),
        Err(e) => {
            warn!(error = %e, "config unreadable, falling back to default output");
            if cli.json {
                OutputMode::Json
            } else {
                OutputMode::Text
            }
        }
    }
}

fn dispatch(command: Commands, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Init(args) => cmd::init::run_init(&args, output, project_root),
        Commands::Import(args) => cmd::import::run_import(&args, output, project_root),
        Commands::Show(args) => cmd::show::run_show(&args, output, project_root),
        Commands::Tiers(args) => cmd::tier::run_tiers(&args, output, project_root),
        Commands::Draft(args) => cmd::draft::run_draft(&args, true, output, project_root),
        Commands::Undraft(args) => cmd::draft::run_draft(&args, false, output, project_root),
        Commands::Up(args) => {
            cmd::order::run_move(&args, cmd::order::Direction::Up, output, project_root)
        }
        Commands::Down(args) => {
            cmd::order::run_move(&args, cmd::order::Direction::Down, output, project_root)
        }
        Commands::Reorder(args) => cmd::order::run_reorder(&args, output, project_root),
        Commands::Drag(args) => cmd::drag::run_drag(&args, output, project_root),
        Commands::Assign(args) => cmd::assign::run_assign(&args, output, project_root),
        Commands::Tier { command } => cmd::tier::run_tier(&command, output, project_root),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let project_root = std::env::current_dir()?;
    let output = output_mode(&cli, &project_root);
    debug!(?output, root = %project_root.display(), "starting");

    if let Err(err) = dispatch(cli.command, output, &project_root) {
        render_error(output, &CliError::from(&err))?;
        std::process::exit(1);
    }
    Ok(())
}
