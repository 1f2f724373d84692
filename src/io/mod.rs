//! Terminal output for the command-line host.

pub mod terminal_bar;

pub use terminal_bar::{BarOptions, BarStyle, TerminalBar, TerminalDisplays, render_cells};

/// Colors are used on an interactive stderr unless `NO_COLOR` is set.
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && is_terminal::is_terminal(std::io::stderr())
}
