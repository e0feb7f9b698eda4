//! Verify command handler module.
//!
//! Validates JSONL draw records against the draw rules:
//!
//! - Twelve groups, each filled in slot order with one team per pool
//! - Confederation limits per group
//! - Hosts in slot 1 of the fixed group stored with the record
//! - Consistency between the group listing and the assignment map
//! - Draw ids of the form `YYYYMMDD-NNNNNN`, unique within the file
//!
//! Errors are collected using the shared `BatchValidationError` pattern.

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::read_text;
use groupdraw_engine::record::DrawRecord;
use groupdraw_engine::rules::ConfederationRule;
use std::collections::HashSet;
use std::io::Write;

/// The `usize` context is the 1-based record number.
type VerifyError = BatchValidationError<usize>;

/// Handle the verify command.
///
/// # Example
///
/// ```no_run
/// # use std::io;
/// # use groupdraw_cli::commands::handle_verify_command;
/// let input = "data/draws.jsonl".to_string();
/// let result = handle_verify_command(input, &mut io::stdout(), &mut io::stderr());
/// ```
pub fn handle_verify_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = read_text(&input).map_err(CliError::InvalidInput)?;
    let rule = ConfederationRule::default();

    let mut errors: Vec<VerifyError> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut draws = 0usize;

    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        draws += 1;
        let record: DrawRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                errors.push(VerifyError {
                    item_context: draws,
                    message: format!("Invalid record: {}", e),
                });
                continue;
            }
        };
        if !valid_draw_id(&record.draw_id) {
            errors.push(VerifyError {
                item_context: draws,
                message: format!("invalid draw_id {}", record.draw_id),
            });
        }
        if !seen_ids.insert(record.draw_id.clone()) {
            errors.push(VerifyError {
                item_context: draws,
                message: format!("duplicate draw_id {}", record.draw_id),
            });
        }
        errors.extend(
            record
                .violations(&rule)
                .into_iter()
                .map(|message| VerifyError {
                    item_context: draws,
                    message,
                }),
        );
    }

    if errors.is_empty() {
        writeln!(out, "Verify: OK (draws={})", draws)?;
        Ok(())
    } else {
        writeln!(out, "Verify: FAIL (draws={})", draws)?;
        writeln!(err)?;
        writeln!(err, "Errors found:")?;
        for error in &errors {
            writeln!(err, "  Draw {}: {}", error.item_context, error.message)?;
        }
        writeln!(err)?;
        let invalid: HashSet<usize> = errors.iter().map(|e| e.item_context).collect();
        writeln!(
            err,
            "Summary: {} error(s) in {} draws ({} invalid draws)",
            errors.len(),
            draws,
            invalid.len()
        )?;
        Err(CliError::InvalidInput(format!(
            "{} validation errors found",
            errors.len()
        )))
    }
}

/// `YYYYMMDD-NNNNNN`
fn valid_draw_id(id: &str) -> bool {
    match id.split_once('-') {
        Some((date, seq)) => {
            date.len() == 8
                && seq.len() == 6
                && date.chars().all(|c| c.is_ascii_digit())
                && seq.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
