//! CLI frontend for the Rollkeeper dice roller.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use rk_engine::RollMode;
use rk_history::{RollTags, RollerConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::Context;

#[derive(Parser)]
#[command(
    name = "rk",
    about = "Rollkeeper - a dice roller with roll history for tabletop games",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding the roll database and profile
    #[arg(short, long, global = true, env = "RK_DIR", default_value = ".")]
    dir: PathBuf,

    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Session tag for logged rolls; also filters `history`
    #[arg(short, long, global = true)]
    session: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a dice expression such as d20, 2d6+3 or d8-1
    Roll {
        /// Dice expression
        #[arg(allow_hyphen_values = true)]
        expr: String,

        /// Roll each die twice and keep the higher
        #[arg(long = "adv", conflicts_with = "disadvantage")]
        advantage: bool,

        /// Roll each die twice and keep the lower
        #[arg(long = "dis")]
        disadvantage: bool,

        /// Context tag (e.g. attack, damage)
        #[arg(short, long)]
        context: Option<String>,

        /// Character tag
        #[arg(long)]
        character: Option<String>,

        /// Roll without writing to the history
        #[arg(long)]
        no_log: bool,
    },

    /// Show, select or clear your role
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },

    /// Manage and roll the dice slots of the selected role
    Slot {
        #[command(subcommand)]
        action: SlotAction,
    },

    /// List logged rolls, newest first
    History {
        /// Maximum number of rolls to show (default: 50)
        #[arg(short, long)]
        limit: Option<u32>,

        /// Show one page of the full history (starting at 0)
        #[arg(short, long, conflicts_with_all = ["die", "character", "context", "range"])]
        page: Option<u32>,

        /// Only rolls of this dice type (e.g. d20, 2d6)
        #[arg(long)]
        die: Option<String>,

        /// Only rolls for this character
        #[arg(long)]
        character: Option<String>,

        /// Only rolls with this context
        #[arg(short, long)]
        context: Option<String>,

        /// Date range: all, today, yesterday, week, month
        #[arg(short, long)]
        range: Option<String>,
    },

    /// Show roll statistics
    Stats {
        /// Also show the result distribution for one dice type
        #[arg(long)]
        die: Option<String>,
    },

    /// Export the roll history
    Export {
        /// Output format: csv, json, markdown
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include statistics
        #[arg(long)]
        stats: bool,

        /// Date range: all, today, yesterday, week, month
        #[arg(short, long)]
        range: Option<String>,
    },

    /// Delete rolls older than a number of days
    Prune {
        /// Age in days
        #[arg(long)]
        days: u32,
    },

    /// Delete one roll by id
    Delete {
        /// Roll id
        id: i64,
    },

    /// Delete the entire roll history
    Clear,
}

#[derive(Subcommand)]
enum RoleAction {
    /// Show the selected role and its slots
    Show,
    /// Select a role: player or dm
    Set {
        /// Role name
        role: String,
    },
    /// Forget the selected role
    Clear,
}

#[derive(Subcommand)]
enum SlotAction {
    /// List the slots of the selected role
    List,
    /// Add a slot to the selected role
    Add {
        /// Slot name
        name: String,

        /// Die (e.g. d20)
        die: String,

        /// Roll mode: normal, advantage, disadvantage
        #[arg(short, long, default_value = "normal")]
        mode: String,

        /// Modifier, applied in order: flat:+2, mul:2, min:3, reroll
        #[arg(long = "modifier", allow_hyphen_values = true)]
        modifiers: Vec<String>,
    },
    /// Remove a slot by name or id
    Remove {
        /// Slot name or id prefix
        slot: String,
    },
    /// Roll one slot, or every slot with --all
    Roll {
        /// Slot name or id prefix
        #[arg(required_unless_present = "all")]
        slot: Option<String>,

        /// Roll every slot in order with a running total
        #[arg(long, conflicts_with = "slot")]
        all: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "rk=debug,rk_engine=debug,rk_history=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = RollerConfig::default()
        .with_data_dir(cli.dir)
        .with_seed(cli.seed);
    if let Some(session) = cli.session {
        config = config.with_session(session);
    }
    let ctx = Context::new(config);

    let result = match cli.command {
        Commands::Roll {
            expr,
            advantage,
            disadvantage,
            context,
            character,
            no_log,
        } => {
            let mode = if advantage {
                RollMode::Advantage
            } else if disadvantage {
                RollMode::Disadvantage
            } else {
                RollMode::Normal
            };
            let tags = RollTags {
                context,
                character_name: character,
                ..ctx.tags()
            };
            commands::roll::run(&ctx, &expr, mode, tags, no_log).await
        }
        Commands::Role { action } => match action {
            RoleAction::Show => commands::role::show(&ctx),
            RoleAction::Set { role } => commands::role::set(&ctx, &role),
            RoleAction::Clear => commands::role::clear(&ctx),
        },
        Commands::Slot { action } => match action {
            SlotAction::List => commands::slot::list(&ctx),
            SlotAction::Add {
                name,
                die,
                mode,
                modifiers,
            } => commands::slot::add(&ctx, &name, &die, &mode, &modifiers),
            SlotAction::Remove { slot } => commands::slot::remove(&ctx, &slot),
            SlotAction::Roll { slot, all } => match (slot, all) {
                (_, true) => commands::slot::roll_all(&ctx).await,
                (Some(slot), false) => commands::slot::roll(&ctx, &slot).await,
                (None, false) => Err("specify a slot or --all".into()),
            },
        },
        Commands::History {
            limit,
            page,
            die,
            character,
            context,
            range,
        } => {
            let query = commands::history::Query {
                limit,
                page,
                die,
                session: ctx.config.session_id.clone(),
                character,
                context,
                range,
            };
            commands::history::run(&ctx, query).await
        }
        Commands::Stats { die } => commands::stats::run(&ctx, die.as_deref()).await,
        Commands::Export {
            format,
            output,
            stats,
            range,
        } => commands::export::run(&ctx, &format, output.as_deref(), stats, range.as_deref()).await,
        Commands::Prune { days } => commands::prune::run(&ctx, days).await,
        Commands::Delete { id } => commands::delete::run(&ctx, id).await,
        Commands::Clear => commands::clear::run(&ctx).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
