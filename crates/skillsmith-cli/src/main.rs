mod cmd;
mod output;
mod prompt;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, learn::GenerateArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skillsmith",
    about = "Resolve agent skill topics to paths and regenerate them without duplicates",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .claude/ or .git/)
    #[arg(long, global = true, env = "SKILLSMITH_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the slug a topic resolves to
    Slug {
        /// Topic words
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
    },

    /// Show the scope and output root an invocation resolves to
    Resolve {
        /// Topic and modifiers, e.g. "laravel 12 --global"
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List entries that already belong to a topic
    Scan {
        /// Topic and modifiers
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Preview what learning a topic would create, replace, or keep
    Plan(GenerateArgs),

    /// Generate the skill entries for a topic
    Learn(GenerateArgs),

    /// Generate one skill per source area of this project
    Analyze(GenerateArgs),

    /// List every entry under a scope's output root
    List {
        /// List the user scope instead of the project scope
        #[arg(long, visible_alias = "user")]
        global: bool,
    },

    /// Print one entry's SKILL.md
    Show {
        /// Entry name, e.g. react-hooks
        name: String,
        #[arg(long, visible_alias = "user")]
        global: bool,
    },

    /// Delete every entry belonging to a topic
    Remove {
        /// Topic and modifiers
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Inspect and validate .claude/skillsmith.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Slug { topic } => cmd::inspect::slug(&topic, cli.json),
        Commands::Resolve { args } => cmd::inspect::resolve(&root, &args, cli.json),
        Commands::Scan { args } => cmd::inspect::scan(&root, &args, cli.json),
        Commands::Plan(args) => cmd::learn::plan(&root, args, cli.json),
        Commands::Learn(args) => cmd::learn::learn(&root, args, cli.json),
        Commands::Analyze(args) => cmd::learn::analyze(&root, args, cli.json),
        Commands::List { global } => cmd::entry::list(&root, global, cli.json),
        Commands::Show { name, global } => cmd::entry::show(&root, &name, global, cli.json),
        Commands::Remove { args, yes } => cmd::entry::remove(&root, &args, yes, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
