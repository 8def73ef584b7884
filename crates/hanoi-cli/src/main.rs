mod config;
mod plan_cmd;
mod render;
mod replay_cmd;
mod tui;
mod verify_cmd;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use hanoi_core::{Peg, PlanError, Roles};

use config::{CliOverrides, HanoiConfig};

#[derive(Parser)]
#[command(name = "hanoi", about = "Optimal Tower of Hanoi planner with step-by-step replay")]
struct Cli {
    /// Pause between replayed moves in milliseconds (overrides HANOI_STEP_DELAY_MS)
    #[arg(long, global = true)]
    step_delay_ms: Option<u64>,

    /// Largest accepted disk count (overrides HANOI_MAX_DISKS)
    #[arg(long, global = true)]
    max_disks: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            step_delay_ms: self.step_delay_ms,
            max_disks: self.max_disks,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a hanoi config file with default settings
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the optimal move sequence
    Plan {
        /// Number of disks
        #[arg(allow_negative_numbers = true)]
        disks: i64,
        #[command(flatten)]
        pegs: PegArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Animate the optimal solution
    Solve {
        /// Number of disks
        #[arg(default_value_t = 4, allow_negative_numbers = true)]
        disks: i64,
        #[command(flatten)]
        pegs: PegArgs,
        /// How to show each step
        #[arg(long, value_enum, default_value_t = RendererKind::Tui)]
        renderer: RendererKind,
    },
    /// Replay the moves of a transcript file
    Replay {
        /// Path to a transcript (.toml or .json)
        file: PathBuf,
        /// How to show each step
        #[arg(long, value_enum, default_value_t = RendererKind::Text)]
        renderer: RendererKind,
    },
    /// Check that a transcript solves its puzzle
    Verify {
        /// Path to a transcript (.toml or .json)
        file: PathBuf,
    },
}

impl Commands {
    fn renderer(&self) -> Option<RendererKind> {
        match self {
            Self::Solve { renderer, .. } | Self::Replay { renderer, .. } => Some(*renderer),
            _ => None,
        }
    }
}

/// Which peg plays which role.
#[derive(Args, Debug, Clone, Copy)]
pub struct PegArgs {
    /// Peg holding the disks at the start
    #[arg(long, default_value_t = Peg::A)]
    source: Peg,
    /// Peg used for parking
    #[arg(long, default_value_t = Peg::B)]
    auxiliary: Peg,
    /// Peg the disks must end on
    #[arg(long, default_value_t = Peg::C)]
    destination: Peg,
}

impl PegArgs {
    pub fn roles(&self) -> Result<Roles, PlanError> {
        Roles::new(self.source, self.auxiliary, self.destination)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    /// One move per line
    Text,
    /// Transcript as TOML
    Toml,
    /// Transcript as JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererKind {
    /// Full-screen terminal view
    Tui,
    /// One line per move
    Text,
    /// JSON lines, one event per move
    Json,
}

/// Execute the `hanoi init` command: write config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile::default();
    let path = config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  replay.step_delay_ms = {}", cfg.replay.step_delay_ms);
    println!("  replay.max_disks = {}", cfg.replay.max_disks);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The full-screen view owns the terminal; keep logs out of it unless
    // RUST_LOG asks for them.
    let default_filter = match cli.command.renderer() {
        Some(RendererKind::Tui) => "off",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let overrides = cli.overrides();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(force)?;
        }
        Commands::Plan {
            disks,
            pegs,
            format,
            output,
        } => {
            let resolved = HanoiConfig::resolve(overrides)?;
            plan_cmd::run_plan(disks, &pegs, format, output.as_deref(), &resolved)?;
        }
        Commands::Solve {
            disks,
            pegs,
            renderer,
        } => {
            let resolved = HanoiConfig::resolve(overrides)?;
            replay_cmd::run_solve(disks, &pegs, renderer, &resolved).await?;
        }
        Commands::Replay { file, renderer } => {
            let resolved = HanoiConfig::resolve(overrides)?;
            replay_cmd::run_replay_file(&file, renderer, &resolved).await?;
        }
        Commands::Verify { file } => {
            let resolved = HanoiConfig::resolve(overrides)?;
            verify_cmd::run_verify(&file, &resolved)?;
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serialize tests that touch process environment variables.
    pub fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }
}
