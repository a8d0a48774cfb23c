use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use clove::Result;
use clove::commands::add::{self, AddRequest};
use clove::commands::completions::{self, Shell};
use clove::commands::remove::{self, RemoveRequest};
use clove::commands::{list, prune};

const LOG_ENV: &str = "CLOVE_LOG";

#[derive(Parser)]
#[command(name = "clove")]
#[command(about = "Create and remove git worktrees next to your repository")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a worktree for a branch in a sibling directory
    Add {
        /// Branch to check out (created from the base if it does not exist)
        #[arg(value_hint = ValueHint::Other)]
        branch: String,
        /// Base reference for a new branch (default: the remote's default branch)
        #[arg(long)]
        base: Option<String>,
        /// Directory name prefix (default: repository name)
        #[arg(long)]
        prefix: Option<String>,
        /// Directory name suffix
        #[arg(long)]
        suffix: Option<String>,
        /// Directory name to use instead of `<prefix>-<branch><suffix>`
        #[arg(long = "dir", value_hint = ValueHint::DirPath)]
        dir_name: Option<String>,
        /// Open the new worktree with this program, e.g. `code`
        #[arg(long = "open", value_hint = ValueHint::CommandName)]
        open_with: Option<String>,
        /// Print the planned commands without running them
        #[arg(long)]
        dry_run: bool,
        /// Skip fetching the remote before creating the worktree
        #[arg(long)]
        no_fetch: bool,
        /// Repository to operate on (default: discovered from the current directory)
        #[arg(long, value_hint = ValueHint::DirPath)]
        repo: Option<PathBuf>,
    },
    /// List all worktrees
    List {
        /// Machine-readable output
        #[arg(long)]
        porcelain: bool,
        /// Repository to operate on
        #[arg(long, value_hint = ValueHint::DirPath)]
        repo: Option<PathBuf>,
    },
    /// Prune stale worktree administrative data (`-v` is forwarded to git)
    Prune {
        /// Only report what would be pruned
        #[arg(long)]
        dry_run: bool,
        /// Repository to operate on
        #[arg(long, value_hint = ValueHint::DirPath)]
        repo: Option<PathBuf>,
    },
    /// Remove a worktree by path or branch name
    #[command(visible_alias = "rm")]
    Remove {
        /// Worktree path or branch name. If not provided, opens interactive selection
        #[arg(value_hint = ValueHint::AnyPath)]
        target: Option<String>,
        /// Remove even with uncommitted changes
        #[arg(short, long)]
        force: bool,
        /// Print the command without running it
        #[arg(long)]
        dry_run: bool,
        /// Launch interactive selection mode
        #[arg(long)]
        interactive: bool,
        /// Repository to operate on
        #[arg(long, value_hint = ValueHint::DirPath)]
        repo: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let verbose = cli.verbose;

    match cli.command {
        Commands::Add {
            branch,
            base,
            prefix,
            suffix,
            dir_name,
            open_with,
            dry_run,
            no_fetch,
            repo,
        } => {
            let request = AddRequest {
                branch,
                base,
                prefix,
                suffix,
                dir_name,
                open_with,
                dry_run,
                no_fetch,
            };
            add::add_worktree(&request, repo.as_deref())?;
        }
        Commands::List { porcelain, repo } => {
            list::list_worktrees(porcelain, repo.as_deref())?;
        }
        Commands::Prune { dry_run, repo } => {
            prune::prune_worktrees(dry_run, verbose, repo.as_deref())?;
        }
        Commands::Remove {
            target,
            force,
            dry_run,
            interactive,
            repo,
        } => {
            let request = RemoveRequest {
                target,
                force,
                dry_run,
                interactive,
            };
            remove::remove_worktree(&request, repo.as_deref())?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            completions::generate_completions(shell, &mut cmd);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
