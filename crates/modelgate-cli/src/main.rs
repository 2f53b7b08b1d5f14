//! CLI entry point for modelgate.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and exit
//! codes. All business logic lives in the `modelgate-app` crate.
//!
//! Exit codes:
//! - 0: pass, or failures that do not block
//! - enforcement exit code (1 by default): blocked by an `enforce` policy
//! - 2: runtime error (unreadable or invalid input)

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser, Subcommand};
use modelgate_app::{
    CheckInput, ContextOverrides, ExplainOutput, format_explanation, format_not_found,
    parse_report_json, render_report, requested_formats, run_check, run_explain, summary_line,
    write_artifacts, write_text,
};
use modelgate_render::{ReportFormat, UnknownFormat};
use modelgate_settings::PolicyFormat;
use std::process::ExitCode;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const EXIT_RUNTIME_ERROR: u8 = 2;
const EXIT_UNKNOWN_CODE: u8 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "modelgate",
    version,
    about = "Policy gate for AI model selection"
)]
struct Cli {
    /// Log debug events to stderr (otherwise RUST_LOG, default `warn`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate candidate models against a policy and write compliance artifacts.
    Check {
        /// Policy document (YAML, JSON, or TOML by extension).
        #[arg(long)]
        policy: Utf8PathBuf,

        /// Candidate list (JSON array, or object with `candidates`/`models`).
        #[arg(long)]
        candidates: Utf8PathBuf,

        /// Evaluation context (JSON with backend, ram_gb, is_local, hardware).
        #[arg(long)]
        context: Option<Utf8PathBuf>,

        /// Inference backend; overrides the context file.
        #[arg(long)]
        backend: Option<String>,

        /// Available RAM in GB; overrides the context file.
        #[arg(long, value_parser = parse_ram_gb)]
        ram_gb: Option<f64>,

        /// Treat the runtime as local; overrides the context file.
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "remote")]
        local: bool,

        /// Treat the runtime as remote; overrides the context file.
        #[arg(long, action = ArgAction::SetTrue)]
        remote: bool,

        /// Output format: json, csv, sarif, or all (default: the policy's reporting.formats, else json).
        #[arg(long)]
        format: Option<String>,

        /// Directory for report artifacts.
        #[arg(long, default_value = "artifacts/modelgate")]
        out_dir: Utf8PathBuf,

        /// File name stem for report artifacts.
        #[arg(long, default_value = "compliance-report")]
        stem: String,

        /// Evaluation instant (RFC 3339); defaults to the current time.
        #[arg(long)]
        now: Option<String>,
    },

    /// Re-encode a saved JSON report.
    Render {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/modelgate/compliance-report.json")]
        report: Utf8PathBuf,

        /// Output format: json, csv, or sarif.
        #[arg(long)]
        format: String,

        /// Where to write the output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a violation code with remediation guidance.
    Explain {
        /// The violation code (e.g. "MODEL_DENIED").
        code: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.cmd {
        Commands::Check {
            policy,
            candidates,
            context,
            backend,
            ram_gb,
            local,
            remote,
            format,
            out_dir,
            stem,
            now,
        } => cmd_check(CheckArgs {
            policy,
            candidates,
            context,
            overrides: ContextOverrides {
                backend,
                ram_gb,
                is_local: locality_flag(local, remote),
            },
            format,
            out_dir,
            stem,
            now,
        }),
        Commands::Render {
            report,
            format,
            output,
        } => cmd_render(&report, &format, output.as_deref()),
        Commands::Explain { code } => Ok(cmd_explain(&code)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("modelgate error: {err:#}");
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second initialisation (e.g. under a test harness) is harmless.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn parse_ram_gb(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.trim().parse().map_err(|err| format!("{err}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a finite non-negative number of GB, got `{raw}`"))
    }
}

fn locality_flag(local: bool, remote: bool) -> Option<bool> {
    match (local, remote) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

struct CheckArgs {
    policy: Utf8PathBuf,
    candidates: Utf8PathBuf,
    context: Option<Utf8PathBuf>,
    overrides: ContextOverrides,
    format: Option<String>,
    out_dir: Utf8PathBuf,
    stem: String,
    now: Option<String>,
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<u8> {
    let now = match args.now.as_deref() {
        Some(raw) => OffsetDateTime::parse(raw, &Rfc3339)
            .with_context(|| format!("invalid --now timestamp: {raw}"))?,
        None => OffsetDateTime::now_utc(),
    };

    let policy_text = read(&args.policy, "policy")?;
    let candidates_text = read(&args.candidates, "candidates")?;
    let context_text = args
        .context
        .as_deref()
        .map(|path| read(path, "context"))
        .transpose()?;

    let output = run_check(CheckInput {
        policy_text: &policy_text,
        policy_format: PolicyFormat::from_path(args.policy.as_std_path()),
        policy_path: Some(args.policy.as_str()),
        candidates_text: &candidates_text,
        context_text: context_text.as_deref(),
        overrides: args.overrides,
        now,
    })?;

    let formats = requested_formats(args.format.as_deref(), &output.policy)?;
    let written = write_artifacts(&output.report, &formats, &args.out_dir, &args.stem)?;

    println!("{}", summary_line(&output.report));
    for path in &written {
        println!("wrote {path}");
    }

    Ok(u8::try_from(output.exit_code()).unwrap_or(1))
}

fn cmd_render(report_path: &Utf8Path, format: &str, output: Option<&Utf8Path>) -> anyhow::Result<u8> {
    let format = ReportFormat::parse(format).ok_or_else(|| UnknownFormat(format.to_string()))?;
    let text = read(report_path, "report")?;
    let report = parse_report_json(&text)?;
    let rendered = render_report(&report, format)?;

    match output {
        Some(path) => write_text(path, &rendered).context("write rendered report")?,
        None => print!("{rendered}"),
    }
    Ok(0)
}

fn cmd_explain(code: &str) -> u8 {
    match run_explain(code) {
        ExplainOutput::Found { code, explanation } => {
            print!("{}", format_explanation(&code, &explanation));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available_codes,
        } => {
            eprint!("{}", format_not_found(&identifier, available_codes));
            EXIT_UNKNOWN_CODE
        }
    }
}

fn read(path: &Utf8Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what}: {path}"))
}
