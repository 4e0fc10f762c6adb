use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// pdbcompare - verify the sequence points of a rewritten .NET module against the original
#[derive(Debug, Parser)]
#[command(name = "pdbcompare", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level: trace, debug, info, warn or error. RUST_LOG takes precedence.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Additionally write every log line to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// Options controlling how a module and its symbols are loaded.
#[derive(Debug, Parser)]
pub struct LoadOptions {
    /// Also compare nested types, by default only top-level types are listed.
    #[arg(long)]
    pub include_nested: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare the sequence points of two modules. Exits with the number of errors, capped at 255.
    Compare {
        /// The original module, or a JSON snapshot of it.
        #[arg(value_name = "FIRST")]
        first: PathBuf,

        /// The rewritten module, or a JSON snapshot of it.
        #[arg(value_name = "SECOND")]
        second: PathBuf,

        /// Do not report differing start lines of the first sequence points.
        #[arg(long)]
        disable_line_nr_comparison: bool,

        /// Compare types in parallel.
        #[arg(long)]
        parallel: bool,

        /// Portable PDB of the original module, instead of searching for it.
        #[arg(long, value_name = "PDB")]
        first_pdb: Option<PathBuf>,

        /// Portable PDB of the rewritten module, instead of searching for it.
        #[arg(long, value_name = "PDB")]
        second_pdb: Option<PathBuf>,

        /// Print the number of findings per kind after the findings.
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        load: LoadOptions,
    },

    /// Load a module and write its graph as a JSON snapshot.
    Dump {
        /// The module to load.
        #[arg(value_name = "MODULE")]
        path: PathBuf,

        /// Write the snapshot to this file instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Portable PDB of the module, instead of searching for it.
        #[arg(long, value_name = "PDB")]
        pdb: Option<PathBuf>,

        /// Do not read debug symbols.
        #[arg(long)]
        no_symbols: bool,

        /// List the methods with their first sequence point instead of writing a snapshot.
        #[arg(long)]
        methods: bool,

        #[command(flatten)]
        load: LoadOptions,
    },
}
