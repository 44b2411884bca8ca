use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use hazelshark_core::{AnalysisConfig, DecodeError, PacketRecord, Report, decode_packet};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("HAZELSHARK_BUILD_COMMIT"),
    ")"
);
const LOG_ENV: &str = "HAZELSHARK_LOG";

const EXAMPLES: &str = "Examples:\n  hazelshark pcap analyse capture.pcapng -o report.json\n  hazelshark pcap analyze capture.pcap --stdout --pretty --port 22023 --port 22123\n  hazelshark decode \"0a 00 01 f6\"";

#[derive(Parser, Debug)]
#[command(name = "hazelshark")]
#[command(version = VERSION)]
#[command(
    about = "Passive dissector for Hazel game traffic in PCAP/PCAPNG captures.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// Decode a single datagram given as hex.
    Decode(DecodeArgs),
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Analyse a capture file and generate a versioned JSON report.
    #[command(alias = "analyze")]
    #[command(after_help = EXAMPLES)]
    Analyse(AnalyseArgs),
}

#[derive(Args, Debug)]
struct AnalyseArgs {
    /// Path to a .pcap or .pcapng file
    input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if compliance violations are present
    #[arg(long)]
    strict: bool,

    /// List compliance violations after analysis
    #[arg(long)]
    list_violations: bool,

    /// UDP port carrying Hazel traffic (repeatable, default 22023)
    #[arg(long = "port", value_name = "PORT")]
    ports: Vec<u16>,

    /// Omit per-packet entries from the report
    #[arg(long)]
    summary_only: bool,

    /// Enable debug logging on stderr
    #[arg(long)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Datagram bytes as hex; whitespace and ':' separators are ignored
    hex: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable debug logging on stderr
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pcap {
            command: PcapCommands::Analyse(args),
        } => {
            init_tracing(args.verbose);
            cmd_pcap_analyse(args).map(|()| ExitCode::SUCCESS)
        }
        Commands::Decode(args) => {
            init_tracing(args.verbose);
            cmd_decode(args)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_pcap_analyse(args: AnalyseArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report_path = if args.stdout {
        None
    } else {
        let path = args.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_output(&path, &input_abs)?;
        Some(path)
    };

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", args.input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }

    let config = AnalysisConfig {
        include_packets: !args.summary_only,
        ..AnalysisConfig::default().with_ports(args.ports.clone())
    };
    tracing::debug!(ports = ?config.ports, input = %resolved_input.display(), "starting analysis");
    let rep = hazelshark_core::analyze_pcap_file(&resolved_input, &config)
        .context("PCAP/PCAPNG analysis failed")?;
    let json = serialize_json(&rep, args.pretty)?;

    match report_path {
        None => print!("{}", json),
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", path.display());
            }
        }
    }

    if args.list_violations && !args.quiet {
        print_violations(&rep);
    }
    if args.strict && has_violations(&rep) {
        return Err(CliError::new(
            "compliance violations detected",
            Some("use --list-violations to inspect".to_string()),
        ));
    }
    Ok(())
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let parent = match report_path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return Ok(()),
    };
    // A directory that does not exist yet cannot hold the input.
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

#[derive(Serialize)]
struct DecodeOutput<'a> {
    summary: String,
    record: &'a PacketRecord<'a>,
    error: Option<&'a DecodeError>,
}

fn cmd_decode(args: DecodeArgs) -> Result<ExitCode, CliError> {
    let bytes = parse_hex(&args.hex)?;
    let (record, error) = decode_packet(&bytes);
    let output = DecodeOutput {
        summary: record.summary(),
        record: &record,
        error: error.as_ref(),
    };
    println!("{}", serialize_json(&output, args.pretty)?);
    eprintln!("{}", output.summary);

    match error {
        Some(err) => {
            eprintln!("error: {}", err);
            Ok(ExitCode::from(1))
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

fn parse_hex(input: &str) -> Result<Vec<u8>, CliError> {
    let digits: Vec<char> = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let invalid = |detail: String| {
        CliError::new(
            format!("invalid hex input: {}", detail),
            Some("pass bytes as hex pairs, e.g. \"0c 00 01\"".to_string()),
        )
    };
    if let Some(bad) = digits.iter().find(|c| !c.is_ascii_hexdigit()) {
        return Err(invalid(format!("'{}' is not a hex digit", bad)));
    }
    if digits.len() % 2 != 0 {
        return Err(invalid(format!("odd number of digits ({})", digits.len())));
    }
    Ok(digits
        .chunks(2)
        .filter_map(|pair| Some(((pair[0].to_digit(16)? << 4) | pair[1].to_digit(16)?) as u8))
        .collect())
}

fn serialize_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn has_violations(rep: &Report) -> bool {
    rep.compliance
        .iter()
        .any(|entry| !entry.violations.is_empty())
}

fn print_violations(rep: &Report) {
    eprintln!("Compliance violations:");
    for entry in &rep.compliance {
        for violation in &entry.violations {
            eprintln!(
                "  {} {} [{}] ({})",
                entry.protocol, violation.id, violation.severity, violation.count
            );
        }
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let invalid = |detail: String| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", detail)),
        )
    };
    let mut matches = Vec::new();
    for entry in glob(&pattern).map_err(|err| invalid(err.msg.to_string()))? {
        let path = entry.map_err(|err| invalid(err.to_string()))?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if count > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}",
                    pattern, count, listed
                ),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

#[cfg(test)]
mod tests {
    use super::{is_glob_pattern, parse_hex};

    #[test]
    fn hex_accepts_separators() {
        assert_eq!(parse_hex("0c 00:01").unwrap(), vec![0x0C, 0x00, 0x01]);
        assert_eq!(parse_hex("DEADbeef").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn hex_rejects_odd_and_non_hex() {
        assert!(parse_hex("0c0").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn hex_rejects_sign_characters() {
        assert!(parse_hex("+a+b").is_err());
        assert!(parse_hex("-1ff").is_err());
        let err = parse_hex("0c+1").unwrap_err();
        assert!(err.message.contains("'+' is not a hex digit"));
    }

    #[test]
    fn glob_detection() {
        assert!(is_glob_pattern("captures/*.pcapng"));
        assert!(!is_glob_pattern("capture.pcapng"));
    }
}
