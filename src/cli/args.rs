//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Skill progress bars with debounced auto-hide
#[derive(Parser)]
#[command(
    name = "skillbars",
    version = env!("CARGO_PKG_VERSION"),
    about = "Skill progress bars with debounced auto-hide",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Play a scripted session showing auto-hide, pinning and suppression
    Demo {
        /// Subject whose bars are shown
        #[arg(long, default_value = "steve")]
        subject: String,

        /// Quiet period in ticks (overrides config)
        #[arg(long)]
        ticks: Option<u32>,
    },

    /// Read bar events and xpbar commands from stdin
    #[command(after_help = "Input lines:\n  \
        gain <skill> <xp> <xp-to-next>\n  \
        xpbar <show|hide|disable|reset> [skill]\n  \
        wait <ms>\n  \
        modes\n  \
        quit")]
    Run {
        /// Subject whose bars are shown
        #[arg(long, default_value = "steve")]
        subject: String,

        /// Mode table to start from, as JSON (e.g. '{"repair":"always_on"}')
        #[arg(long)]
        modes: Option<String>,
    },

    /// Show current configuration
    Config,
}
