//! CLI utilities for appshell tools
//!
//! Provides shared CLI functionality:
//! - Status lines with success/warning glyphs
//! - Duration and count formatting

#![warn(missing_docs)]

pub mod output;
