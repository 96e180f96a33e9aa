//! kpl-agg-validate
//!
//! Decodes base64 encoded KPL aggregated records, verifies the envelope and
//! prints the decoded message.

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgGroup, CommandFactory, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kpl_core::config::ValidateConfig;
use kpl_core::crypto::DigestAlg;
use kpl_core::render::{render_validated, OutputFormat};
use kpl_core::telemetry::TelemetrySnapshot;
use kpl_core::types::ValidateError;
use kpl_core::validate::Validator;

const INPUT_ENV: &str = "KPL_INPUT";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "kpl-agg-validate")]
#[command(about = "Decodes a base64 encoded kinesis record")]
#[command(group(ArgGroup::new("source").args(["input", "file"])))]
struct Cli {
    /// Base64 encoded aggregated record [env: KPL_INPUT when neither --input nor --file is given]
    #[arg(long)]
    input: Option<String>,

    /// File with one base64 record per line ("-" reads stdin)
    #[arg(long)]
    file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the user records instead of the raw message
    #[arg(long)]
    deaggregate: bool,

    /// JSON config file; flags below override it
    #[arg(long, env = "KPL_CONFIG")]
    config: Option<PathBuf>,

    /// Expected magic prefix, hex
    #[arg(long)]
    magic: Option<String>,

    /// Digest algorithm name
    #[arg(long)]
    digest: Option<String>,

    /// Reject decoded frames larger than this many bytes
    #[arg(long, conflicts_with = "no_size_limit")]
    max_frame_bytes: Option<usize>,

    /// Disable the frame size limit
    #[arg(long)]
    no_size_limit: bool,

    /// Print a telemetry snapshot as JSON on stderr when done
    #[arg(long)]
    stats: bool,
}

/// Where the inputs come from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Inline(String),
    File(PathBuf),
}

impl Cli {
    /// `--input` or `--file` when given, else the value of `KPL_INPUT`.
    fn source(&self, env_input: Option<String>) -> Option<Source> {
        match (&self.input, &self.file) {
            (Some(input), _) => Some(Source::Inline(input.clone())),
            (None, Some(path)) => Some(Source::File(path.clone())),
            (None, None) => env_input.map(Source::Inline),
        }
    }

    fn load_config(&self) -> Result<ValidateConfig, ValidateError> {
        let config = match &self.config {
            Some(path) => ValidateConfig::from_file(path)?,
            None => ValidateConfig::default(),
        };
        self.apply_overrides(config)
    }

    /// Flags win over whatever the config file set.
    fn apply_overrides(&self, mut config: ValidateConfig) -> Result<ValidateConfig, ValidateError> {
        if let Some(magic) = &self.magic {
            config.magic = magic.clone();
        }
        if let Some(digest) = &self.digest {
            config.digest = DigestAlg::from_name(digest)?;
        }
        if let Some(max) = self.max_frame_bytes {
            config.max_frame_bytes = Some(max);
        }
        if self.no_size_limit {
            config.max_frame_bytes = None;
        }
        if self.deaggregate {
            config.deaggregate = true;
        }
        Ok(config)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Validate and print one input. Returns whether it succeeded.
fn process<W: Write, E: Write>(
    validator: &mut Validator,
    text: &str,
    format: OutputFormat,
    line: Option<usize>,
    out: &mut W,
    err: &mut E,
) -> io::Result<bool> {
    match validator.validate_and_render(text, |validated| render_validated(validated, format)) {
        Ok(rendered) => {
            write!(out, "{rendered}")?;
            if format == OutputFormat::Json {
                writeln!(out)?;
            }
            Ok(true)
        }
        Err(e) => {
            match line {
                Some(n) => writeln!(err, "error[{}] line {}: {}", e.kind(), n, e)?,
                None => writeln!(err, "error[{}]: {}", e.kind(), e)?,
            }
            Ok(false)
        }
    }
}

/// One input per line; blank lines are skipped but still counted for line numbers.
fn process_lines<R: BufRead, W: Write, E: Write>(
    validator: &mut Validator,
    reader: R,
    format: OutputFormat,
    out: &mut W,
    err: &mut E,
) -> anyhow::Result<bool> {
    let mut all_ok = true;
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", i + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        all_ok &= process(validator, &line, format, Some(i + 1), out, err)?;
    }
    Ok(all_ok)
}

fn run<W: Write, E: Write>(cli: &Cli, source: Source, out: &mut W, err: &mut E) -> anyhow::Result<bool> {
    let config = cli.load_config().context("loading configuration")?;
    let format = OutputFormat::from(cli.format);
    let mut validator = Validator::new(&config).context("building validator")?;

    let all_ok = match source {
        Source::Inline(text) => process(&mut validator, &text, format, None, out, err)?,
        Source::File(path) if path.as_os_str() == "-" => {
            process_lines(&mut validator, io::stdin().lock(), format, out, err)?
        }
        Source::File(path) => {
            let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            process_lines(&mut validator, BufReader::new(file), format, out, err)?
        }
    };

    validator.timer_mut().finish();
    let snapshot = TelemetrySnapshot::from(validator.counters(), validator.timer());
    info!(
        inputs = snapshot.total_inputs,
        failures = snapshot.failures,
        "validation finished"
    );

    if cli.stats {
        writeln!(err, "{}", snapshot.to_json()?)?;
    }

    Ok(all_ok)
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let Some(source) = cli.source(env::var(INPUT_ENV).ok()) else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                format!("one of --input, --file or ${INPUT_ENV} is required"),
            )
            .exit()
    };

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    match run(&cli, source, &mut out, &mut err) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            let _ = writeln!(err, "error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
