//! Command-line argument definitions for the NETAR CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. The first argument picks the conversion direction; the
//! rest control input/output paths, configuration file selection, and
//! logging verbosity.

use std::fmt;

use clap::{Parser, ValueEnum};

/// Command-line arguments for the NETAR topology translator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Conversion to run
    #[arg(value_enum)]
    pub direction: Direction,

    /// Path to the input file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; standard output when absent
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Source and target representation of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Packet Tracer XML to DSL source
    #[value(name = "xml2dsl")]
    XmlToDsl,
    /// DSL source to Packet Tracer XML
    #[value(name = "dsl2xml")]
    DslToXml,
    /// DSL source to graph JSON
    #[value(name = "dsl2graph")]
    DslToGraph,
    /// Packet Tracer XML to graph JSON
    #[value(name = "xml2graph")]
    XmlToGraph,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::XmlToDsl => "xml2dsl",
            Direction::DslToXml => "dsl2xml",
            Direction::DslToGraph => "dsl2graph",
            Direction::XmlToGraph => "xml2graph",
        }
    }

    /// Returns `true` when the input is DSL source text.
    pub fn reads_dsl(self) -> bool {
        matches!(self, Direction::DslToXml | Direction::DslToGraph)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
