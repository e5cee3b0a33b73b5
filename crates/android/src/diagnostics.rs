//! Human-readable evaluation diagnostics
//!
//! Each capability evaluation produces exactly one [`Diagnostic`]. Sinks
//! decide where it goes: the terminal ([`StatusSink`]) or memory
//! ([`MemorySink`]) for JSON output and tests.

use appshell_cli::output::{Glyph, Status};
use serde::Serialize;
use std::fmt;

/// Outcome class of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Rendered with a success glyph
    Success,
    /// Rendered with a warning glyph
    Warning,
}

impl DiagnosticLevel {
    fn glyph(self) -> Glyph {
        match self {
            DiagnosticLevel::Success => Glyph::Success,
            DiagnosticLevel::Warning => Glyph::Warning,
        }
    }
}

/// One decision, reported to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity
    pub level: DiagnosticLevel,
    /// Capability the decision was about
    pub subject: String,
    /// First line
    pub message: String,
    /// Follow-up lines telling the user how to change the outcome
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remediation: Vec<String>,
}

impl Diagnostic {
    /// Diagnostic for a positive outcome
    pub fn success(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Success,
            subject: subject.into(),
            message: message.into(),
            remediation: Vec::new(),
        }
    }

    /// Diagnostic for a degraded outcome
    pub fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            subject: subject.into(),
            message: message.into(),
            remediation: Vec::new(),
        }
    }

    /// Append an indented follow-up line
    #[must_use]
    pub fn with_remediation(mut self, line: impl Into<String>) -> Self {
        self.remediation.push(line.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.glyph().symbol(), self.message)?;
        for line in &self.remediation {
            write!(f, "\n   {line}")?;
        }
        Ok(())
    }
}

/// Receives diagnostics as decisions are made
pub trait DiagnosticSink {
    /// Report one diagnostic
    fn emit(&mut self, diagnostic: &Diagnostic);
}

/// Prints diagnostics to stdout with coloured glyphs
#[derive(Debug, Default)]
pub struct StatusSink;

impl DiagnosticSink for StatusSink {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        match diagnostic.level {
            DiagnosticLevel::Success => Status::success(&diagnostic.message),
            DiagnosticLevel::Warning => Status::warning(&diagnostic.message),
        }
        for line in &diagnostic.remediation {
            Status::detail(line);
        }
    }
}

/// Collects diagnostics in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Collected diagnostics, in emission order
    pub diagnostics: Vec<Diagnostic>,
}

impl MemorySink {
    /// Empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent diagnostic
    #[must_use]
    pub fn last(&self) -> Option<&Diagnostic> {
        self.diagnostics.last()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_remediation_lines() {
        let diagnostic = Diagnostic::warning("push", "google-services.json not found - push disabled")
            .with_remediation("To enable: Download google-services.json from Firebase Console")
            .with_remediation("Place in: app/google-services.json");

        let rendered = diagnostic.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("⚠ "));
        assert_eq!(lines[2], "   Place in: app/google-services.json");
    }

    #[test]
    fn test_memory_sink_collects_in_order() {
        let mut sink = MemorySink::new();
        sink.emit(&Diagnostic::success("a", "first"));
        sink.emit(&Diagnostic::warning("b", "second"));

        assert_eq!(sink.diagnostics.len(), 2);
        assert_eq!(sink.last().unwrap().subject, "b");
    }

    #[test]
    fn test_serialized_level_is_lowercase() {
        let json = serde_json::to_value(Diagnostic::success("push", "ok")).unwrap();
        assert_eq!(json["level"], "success");
        assert!(json.get("remediation").is_none());
    }
}
