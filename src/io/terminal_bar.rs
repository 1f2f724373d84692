//! Text rendering of skill bars for terminals and logs.
//!
//! Each `show()` writes one line such as `Mining       [█████░░░░░]  50%` and
//! each `hide()` writes a short "hidden" line. Bars for one subject share a
//! single writer so their lines never interleave mid-line.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

use crate::bars::{BarDisplay, BarError, DisplayFactory};
use crate::skill::Skill;
use crate::types::SubjectId;

const DEFAULT_BAR_WIDTH: usize = 24;

/// Glyph palettes for horizontal bars.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarStyle {
    /// Dense braille wall, good for compact displays.
    Braille,
    /// Full block (`█`) cells with light empty fill (`░`).
    #[default]
    FullBlock,
    /// Dark shade (`▓`) cells with light empty fill (`░`).
    DarkShade,
    /// Black parallelogram (`▰`) cells with white parallelogram (`▱`) fill.
    Parallelogram,
    /// Plain `#` and `-`, for terminals without Unicode.
    Ascii,
}

impl BarStyle {
    /// Glyph used for filled segments of the bar.
    pub fn filled_cell(self) -> &'static str {
        match self {
            BarStyle::Braille => "⣿",
            BarStyle::FullBlock => "█",
            BarStyle::DarkShade => "▓",
            BarStyle::Parallelogram => "▰",
            BarStyle::Ascii => "#",
        }
    }

    /// Glyph used for empty segments of the bar.
    pub fn empty_cell(self) -> &'static str {
        match self {
            BarStyle::Braille => " ",
            BarStyle::FullBlock | BarStyle::DarkShade => "░",
            BarStyle::Parallelogram => "▱",
            BarStyle::Ascii => "-",
        }
    }
}

/// Configuration options for [`TerminalBar`].
#[derive(Clone, Copy, Debug)]
pub struct BarOptions {
    pub style: BarStyle,
    pub width: usize,
    /// Prefix lines with the subject name
    pub show_subject: bool,
    pub colors: bool,
}

impl BarOptions {
    pub fn new(style: BarStyle, width: usize) -> Self {
        Self {
            style,
            width: width.max(1),
            show_subject: false,
            colors: super::colors_enabled(),
        }
    }

    pub fn with_style(mut self, style: BarStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn show_subject(mut self, show: bool) -> Self {
        self.show_subject = show;
        self
    }

    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }
}

impl Default for BarOptions {
    fn default() -> Self {
        Self::new(BarStyle::default(), DEFAULT_BAR_WIDTH)
    }
}

/// Writer shared by every bar of a [`TerminalDisplays`] factory.
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Renders the filled/empty cells for `progress` (clamped to `[0, 1]`).
pub fn render_cells(progress: f64, options: &BarOptions) -> String {
    let ratio = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((ratio * options.width as f64).round() as usize).min(options.width);
    let empty = options.width - filled;
    format!(
        "{}{}",
        options.style.filled_cell().repeat(filled),
        options.style.empty_cell().repeat(empty)
    )
}

/// A single skill bar written as text lines.
pub struct TerminalBar {
    subject: SubjectId,
    skill: Skill,
    progress: f64,
    options: BarOptions,
    out: SharedWriter,
}

impl TerminalBar {
    fn prefix(&self) -> String {
        let label = format!("{:<12}", self.skill.name());
        let label = if self.options.colors {
            console::style(label).cyan().bold().to_string()
        } else {
            label
        };
        if self.options.show_subject {
            format!("{} {label}", self.subject)
        } else {
            label
        }
    }

    fn write_line(&self, line: &str) -> Result<(), BarError> {
        let mut out = self.out.lock();
        writeln!(out, "{line}")
            .and_then(|_| out.flush())
            .map_err(|e| BarError::display(self.skill, e))
    }
}

impl BarDisplay for TerminalBar {
    fn set_progress(&mut self, progress: f64) -> Result<(), BarError> {
        self.progress = progress;
        Ok(())
    }

    fn show(&mut self) -> Result<(), BarError> {
        let pct = (self.progress.clamp(0.0, 1.0) * 100.0).round() as u8;
        let line = format!(
            "{} [{}] {pct:>3}%",
            self.prefix(),
            render_cells(self.progress, &self.options)
        );
        self.write_line(&line)
    }

    fn hide(&mut self) -> Result<(), BarError> {
        let hidden = if self.options.colors {
            console::style("(hidden)").dim().to_string()
        } else {
            "(hidden)".to_string()
        };
        let line = format!("{} {hidden}", self.prefix());
        self.write_line(&line)
    }
}

/// Creates [`TerminalBar`]s that all write to one shared writer.
#[derive(Clone)]
pub struct TerminalDisplays {
    out: SharedWriter,
    options: BarOptions,
}

impl TerminalDisplays {
    pub fn new(out: Box<dyn Write + Send>, options: BarOptions) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
            options,
        }
    }

    /// Bars on standard error with default options.
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()), BarOptions::default())
    }
}

impl DisplayFactory for TerminalDisplays {
    fn create(&self, subject: &SubjectId, skill: Skill) -> Result<Box<dyn BarDisplay>, BarError> {
        Ok(Box::new(TerminalBar {
            subject: subject.clone(),
            skill,
            progress: 0.0,
            options: self.options,
            out: self.out.clone(),
        }))
    }
}
