//! tabula entrypoint.
//!
//! The binary is a thin shell around the core crates: decode arguments,
//! read the script and the table, run the engine, and write the table
//! back on success only; an aborted script leaves the input file untouched.
//! Every abort maps onto the contract exit code (see [`Failure`]).
//!
//! Diagnostics go to stderr (tracing with `EnvFilter`, plus one final
//! human-readable line); stdout carries only the engine's selector
//! warnings.

use clap::Parser;
use clap::error::ErrorKind;
use core_config::EngineConfig;
use core_engine::{ExecError, execute_script};
use core_script::{ReadError, parser, reader};
use core_table::{Table, TableError};
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "tabula",
    version,
    about = "Batch editor for delimited text tables"
)]
struct Args {
    /// Delimiter set; the first byte is the canonical output delimiter,
    /// the rest are normalized to it on load.
    #[arg(short = 'd', value_name = "DELIMS")]
    delims: Option<String>,
    /// Read commands from a file, one per line, instead of SCRIPT.
    #[arg(short = 'c', value_name = "PATH")]
    command_file: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `tabula.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// `;`-separated command script (omitted when -c is used).
    #[arg(value_name = "SCRIPT")]
    script: Option<String>,
    /// Table file, rewritten in place on success.
    #[arg(value_name = "INPUT_FILE")]
    input: Option<PathBuf>,
}

/// Where the command script comes from.
#[derive(Debug, PartialEq, Eq)]
enum ScriptSource {
    Inline(String),
    File(PathBuf),
}

/// Fully resolved invocation: delimiters validated, positionals assigned.
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    delims: String,
    source: ScriptSource,
    input: PathBuf,
}

/// Every way a run can abort, with its contract exit code.
///
/// | code | meaning |
/// |------|---------|
/// | 1 | missing or surplus arguments |
/// | 2 | invalid delimiter set |
/// | 3 | cannot open input or command file |
/// | 4 | allocation failure (reserved; Rust aborts on OOM) |
/// | 5 | internal invariant violation |
/// | 6 | bad function argument at runtime |
/// | 7 | bad value at runtime |
/// | 8 | malformed command |
/// | 9 | malformed selector |
/// | 10 | numeric-conversion failure |
#[derive(Debug)]
enum Failure {
    Usage(String),
    Delimiters(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Script(ReadError),
    Exec(ExecError),
}

impl Failure {
    fn exit_code(&self) -> u8 {
        match self {
            Failure::Usage(_) => 1,
            Failure::Delimiters(_) => 2,
            Failure::Io { .. } | Failure::Script(_) => 3,
            Failure::Exec(err) => match err {
                ExecError::Internal(_) => 5,
                ExecError::Table(TableError::RowIndex(_) | TableError::ColIndex(_)) => 6,
                ExecError::Table(TableError::Unpopulated) => 7,
                ExecError::Command(_) => 8,
                ExecError::Selector(_) => 9,
                ExecError::NumericConversion(_) => 10,
            },
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Usage(msg) => f.write_str(msg),
            Failure::Delimiters(delims) => write!(f, "invalid delimiter set `{delims}`"),
            Failure::Io { path, source } => {
                write!(f, "cannot open {}: {source}", path.display())
            }
            Failure::Script(err) => err.fmt(f),
            Failure::Exec(err) => err.fmt(f),
        }
    }
}

fn configure_logging() {
    // Diagnostics must stay off stdout; it carries selector warnings.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Assign positionals and validate the delimiter set. With `-c` the single
/// positional is the input file; otherwise the script comes first.
fn resolve(args: Args, config: &EngineConfig) -> Result<Invocation, Failure> {
    let delims = args
        .delims
        .unwrap_or_else(|| config.delimiters.default.clone());
    if !config.delimiters.accepts(&delims) {
        return Err(Failure::Delimiters(delims));
    }

    let (source, input) = match (args.command_file, args.script, args.input) {
        (Some(_), Some(_), Some(_)) => {
            return Err(Failure::Usage(
                "too many arguments: -c replaces SCRIPT".to_string(),
            ));
        }
        (Some(path), Some(input), None) => (ScriptSource::File(path), PathBuf::from(input)),
        (Some(_), None, _) => {
            return Err(Failure::Usage("missing INPUT_FILE argument".to_string()));
        }
        (None, Some(script), Some(input)) => (ScriptSource::Inline(script), input),
        (None, _, _) => {
            return Err(Failure::Usage(
                "expected SCRIPT (or -cPATH) and INPUT_FILE arguments".to_string(),
            ));
        }
    };

    Ok(Invocation {
        delims,
        source,
        input,
    })
}

fn run(args: Args) -> Result<(), Failure> {
    let config = core_config::load_from(args.config.clone()).unwrap_or_default();
    let invocation = resolve(args, &config)?;

    let raw_commands = match &invocation.source {
        ScriptSource::Inline(script) => reader::inline_commands(script),
        ScriptSource::File(path) => reader::file_commands(path).map_err(Failure::Script)?,
    };
    let commands: Vec<_> = raw_commands.iter().map(|raw| parser::parse(raw)).collect();

    let text = std::fs::read_to_string(&invocation.input).map_err(|source| Failure::Io {
        path: invocation.input.clone(),
        source,
    })?;
    let mut table = Table::parse(&text, invocation.delims.as_bytes(), config.growth);
    table.normalize();

    info!(
        target: "runtime.startup",
        input = %invocation.input.display(),
        commands = commands.len(),
        rows = table.height(),
        cols = table.width(),
        delims = %invocation.delims,
        "bootstrap_complete"
    );

    execute_script(&mut table, &commands, &config).map_err(Failure::Exec)?;

    std::fs::write(&invocation.input, table.render()).map_err(|source| Failure::Io {
        path: invocation.input.clone(),
        source,
    })?;
    info!(target: "io", input = %invocation.input.display(), rows = table.height(), "table_saved");
    Ok(())
}

fn main() -> ExitCode {
    configure_logging();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!(target: "runtime", code = failure.exit_code(), "run_aborted");
            eprintln!("tabula: {failure}");
            ExitCode::from(failure.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    fn resolve_ok(argv: &[&str]) -> Invocation {
        resolve(parse(argv), &EngineConfig::default()).unwrap()
    }

    #[test]
    fn inline_script_invocation() {
        let inv = resolve_ok(&["tabula", "[1,1];set X", "table.txt"]);
        assert_eq!(inv.delims, " ");
        assert_eq!(
            inv.source,
            ScriptSource::Inline("[1,1];set X".to_string())
        );
        assert_eq!(inv.input, PathBuf::from("table.txt"));
    }

    #[test]
    fn attached_command_file_invocation() {
        let inv = resolve_ok(&["tabula", "-ccmds.txt", "table.txt"]);
        assert_eq!(inv.source, ScriptSource::File(PathBuf::from("cmds.txt")));
        assert_eq!(inv.input, PathBuf::from("table.txt"));
    }

    #[test]
    fn custom_delimiters() {
        let inv = resolve_ok(&["tabula", "-d", ",;", "drow", "t.csv"]);
        assert_eq!(inv.delims, ",;");
    }

    #[test]
    fn blacklisted_delimiters_exit_2() {
        let failure =
            resolve(parse(&["tabula", "-d", "\"", "drow", "t"]), &EngineConfig::default())
                .unwrap_err();
        assert_eq!(failure.exit_code(), 2);
    }

    #[test]
    fn missing_positionals_exit_1() {
        let failure =
            resolve(parse(&["tabula", "drow"]), &EngineConfig::default()).unwrap_err();
        assert_eq!(failure.exit_code(), 1);
        let failure =
            resolve(parse(&["tabula", "-ccmds"]), &EngineConfig::default()).unwrap_err();
        assert_eq!(failure.exit_code(), 1);
    }

    #[test]
    fn command_file_plus_script_exit_1() {
        let failure = resolve(
            parse(&["tabula", "-ccmds", "drow", "t"]),
            &EngineConfig::default(),
        )
        .unwrap_err();
        assert_eq!(failure.exit_code(), 1);
    }

    #[test]
    fn exec_errors_map_to_contract_codes() {
        assert_eq!(
            Failure::Exec(ExecError::Command("x".into())).exit_code(),
            8
        );
        assert_eq!(
            Failure::Exec(ExecError::Table(TableError::Unpopulated)).exit_code(),
            7
        );
        assert_eq!(
            Failure::Exec(ExecError::Table(TableError::RowIndex(3))).exit_code(),
            6
        );
        assert_eq!(
            Failure::Exec(ExecError::Internal("x".into())).exit_code(),
            5
        );
        assert_eq!(
            Failure::Exec(ExecError::NumericConversion("x".into())).exit_code(),
            10
        );
    }
}
