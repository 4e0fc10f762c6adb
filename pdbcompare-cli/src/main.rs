mod app;
mod commands;
mod output;

use std::{
    fs,
    io::{self, Write},
};

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command, GlobalOptions};

/// Log target writing to stderr and a log file.
struct Tee {
    file: fs::File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn init_logging(opts: &GlobalOptions) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(opts.log_level.into())
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    match &opts.log_file {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create log file: {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(Tee { file })));
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();
    init_logging(&cli.global)?;

    let code = match &cli.command {
        Command::Compare {
            first,
            second,
            disable_line_nr_comparison,
            parallel,
            first_pdb,
            second_pdb,
            summary,
            load,
        } => commands::compare::run(
            first,
            second,
            &commands::compare::CompareArgs {
                compare_start_lines: !*disable_line_nr_comparison,
                parallel: *parallel,
                first_pdb: first_pdb.as_deref(),
                second_pdb: second_pdb.as_deref(),
                summary: *summary,
                load,
            },
            &cli.global,
        )?,
        Command::Dump {
            path,
            output,
            pdb,
            no_symbols,
            methods,
            load,
        } => {
            commands::dump::run(
                path,
                output.as_deref(),
                pdb.as_deref(),
                !*no_symbols,
                *methods,
                load,
                &cli.global,
            )?;
            0
        }
    };

    log::logger().flush();
    std::process::exit(code);
}
