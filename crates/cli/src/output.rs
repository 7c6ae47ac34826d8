use crate::{error::CliError, shutdown::ExitCode};
use engine_processing::outcome::TransferOutcome;
use std::io::Write;

pub fn render(outcome: &TransferOutcome) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Prints the outcome as JSON on stdout.
pub fn print_outcome(outcome: &TransferOutcome) -> Result<(), CliError> {
    let json = render(outcome)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    stdout.flush()?;
    Ok(())
}

pub fn exit_code(outcome: &TransferOutcome, shutdown_requested: bool) -> ExitCode {
    match (outcome.success, shutdown_requested) {
        (true, _) => ExitCode::Success,
        (false, true) => ExitCode::ShutdownRequested,
        (false, false) => ExitCode::GeneralError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_omits_absent_fields() {
        let outcome = TransferOutcome::ok("Connected").with_count(0);
        assert_eq!(
            render(&outcome).unwrap(),
            "{\n  \"success\": true,\n  \"message\": \"Connected\",\n  \"count\": 0\n}"
        );
    }

    #[test]
    fn test_exit_codes() {
        let ok = TransferOutcome::ok("done");
        let mut failed = TransferOutcome::ok("boom");
        failed.success = false;

        assert_eq!(exit_code(&ok, true), ExitCode::Success);
        assert_eq!(exit_code(&failed, false).as_i32(), 1);
        assert_eq!(exit_code(&failed, true).as_i32(), 130);
    }
}
