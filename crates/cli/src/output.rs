//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output. Evaluation diagnostics
//! are part of the tool's normal output, so success and warning lines go
//! to stdout; only errors go to stderr.

use owo_colors::{OwoColorize, Stream};

/// Leading marker of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// `✓`
    Success,
    /// `⚠`
    Warning,
    /// `✗`
    Error,
    /// `ℹ`
    Info,
}

impl Glyph {
    /// The bare symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Glyph::Success => "✓",
            Glyph::Warning => "⚠",
            Glyph::Error => "✗",
            Glyph::Info => "ℹ",
        }
    }

    /// Render `message` behind the coloured glyph
    pub fn render(self, message: &str) -> String {
        let symbol = self.symbol();
        let stream = if self == Glyph::Error { Stream::Stderr } else { Stream::Stdout };
        match self {
            Glyph::Success => format!("{} {}", symbol.if_supports_color(stream, |s| s.green()), message),
            Glyph::Warning => format!("{} {}", symbol.if_supports_color(stream, |s| s.yellow()), message),
            Glyph::Error => format!("{} {}", symbol.if_supports_color(stream, |s| s.red()), message),
            Glyph::Info => format!("{} {}", symbol.if_supports_color(stream, |s| s.blue()), message),
        }
    }
}

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{}", Glyph::Success.render(message));
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{}", Glyph::Error.render(message));
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        println!("{}", Glyph::Warning.render(message));
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{}", Glyph::Info.render(message));
    }

    /// Print an indented continuation line under the previous status line
    pub fn detail(message: &str) {
        println!("   {}", message.if_supports_color(Stream::Stdout, |s| s.dimmed()));
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
