use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use schemagen::CodegenError;
use schemagen::format::CommandFormatter;
use schemagen::output::{EmitOptions, Emitter};
use schemagen::{Schema, render_schema};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "schemagen",
    about = "Generate Rust types from a JSON object schema",
    version
)]
struct Cli {
    /// Schema document to read (use `-` for stdin)
    #[arg(value_name = "SCHEMA")]
    schema: PathBuf,

    /// Write the generated code to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Emit the generated code without formatting it
    #[arg(long)]
    no_format: bool,

    /// Format with `rustfmt` instead of the built-in formatter
    #[arg(long, conflicts_with = "no_format")]
    rustfmt: bool,

    /// Prefix every output line with its line number
    #[arg(long)]
    line_numbers: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initialize tracing subscriber based on verbosity level.
///
/// Logs go to stderr so stdout stays usable for generated code.
fn init_tracing(verbose: u8) {
    if verbose == 0 {
        return;
    }

    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            1 => "warn,schemagen=info".to_string(),
            2 => "info,schemagen=debug".to_string(),
            _ => "debug,schemagen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn read_schema(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CodegenError::Read {
                path: "<stdin>".to_string(),
                source,
            })?;
        return Ok(buf);
    }

    let text = fs::read_to_string(path).map_err(|source| CodegenError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(text)
}

/// Prints the unformatted source with line numbers so the formatter's
/// complaint can be matched to a line.
fn report_format_error(err: &CodegenError) {
    if let CodegenError::Format(format_err) = err {
        eprintln!("{}", format_err.annotated_source());
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let text = read_schema(&cli.schema)?;
    let mut schema = Schema::from_json(&text)
        .wrap_err_with(|| format!("Invalid schema document: {:?}", cli.schema))?;
    schema.organize();
    debug!(objects = schema.objects().len(), "organized schema");

    let source = render_schema(&schema).wrap_err("Failed to generate code")?;

    let options = EmitOptions::new()
        .with_format_code(!cli.no_format)
        .with_line_numbers(cli.line_numbers);
    let mut emitter = Emitter::new(options);
    if cli.rustfmt {
        emitter = emitter.with_formatter(CommandFormatter::rustfmt());
    }

    let result = match &cli.output {
        Some(path) => emitter.write_file(path, &source),
        None => emitter.write(&mut io::stdout().lock(), &source),
    };
    if let Err(err) = &result {
        report_format_error(err);
    }
    result.wrap_err("Failed to emit generated code")?;

    if let Some(path) = &cli.output {
        info!(path = %path.display(), "done");
    }
    Ok(())
}
