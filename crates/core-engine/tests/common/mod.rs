#![allow(dead_code)] // Shared across test binaries; each uses a subset of helpers.

use core_config::EngineConfig;
use core_engine::{ExecError, execute_script};
use core_script::{parser, reader};
use core_table::Table;

/// Load `input` as a space-delimited table, run the inline `script`, and
/// render the resulting table.
pub fn run_script(input: &str, script: &str) -> Result<String, ExecError> {
    run_script_with_delims(input, script, " ")
}

pub fn run_script_with_delims(
    input: &str,
    script: &str,
    delims: &str,
) -> Result<String, ExecError> {
    let config = EngineConfig::default();
    let mut table = Table::parse(input, delims.as_bytes(), config.growth);
    table.normalize();
    let commands: Vec<_> = reader::inline_commands(script)
        .iter()
        .map(|raw| parser::parse(raw))
        .collect();
    execute_script(&mut table, &commands, &config)?;
    Ok(table.render())
}

/// Assert that `script` transforms `input` into exactly `want`.
pub fn expect_output(input: &str, script: &str, want: &str) {
    match run_script(input, script) {
        Ok(got) => assert_eq!(got, want, "script `{script}` on {input:?}"),
        Err(err) => panic!("script `{script}` failed on {input:?}: {err}"),
    }
}

/// Assert that `script` aborts, handing the error back for inspection.
pub fn expect_error(input: &str, script: &str) -> ExecError {
    match run_script(input, script) {
        Ok(got) => panic!("script `{script}` unexpectedly succeeded with {got:?}"),
        Err(err) => err,
    }
}
