//! `hanoi verify` command: check a transcript without animating it.

use std::path::Path;

use anyhow::{Context, Result};

use hanoi_core::{TranscriptFormat, Verification, VerifyError, parse_transcript, verify_sequence};

use crate::config::HanoiConfig;

/// Run the verify command. Exits with status 1 when the moves do not solve
/// the puzzle.
pub fn run_verify(path: &Path, config: &HanoiConfig) -> Result<()> {
    match verify_file(path, config)? {
        Ok(report) => {
            let note = if report.optimal { "optimal" } else { "not optimal" };
            println!(
                "OK: {} solved in {} moves ({note}).",
                path.display(),
                report.moves_applied
            );
            Ok(())
        }
        Err(err) => {
            println!("FAILED: {}", path.display());
            println!("  {err}");
            if let Some(source) = std::error::Error::source(&err) {
                println!("  {source}");
            }
            std::process::exit(1);
        }
    }
}

/// Load a transcript and run it through a fresh engine. The outer error is
/// for unreadable files and disk counts over the ceiling; the inner one
/// describes why the moves fail.
pub fn verify_file(
    path: &Path,
    config: &HanoiConfig,
) -> Result<Result<Verification, VerifyError>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript: {}", path.display()))?;
    let transcript = parse_transcript(&content, TranscriptFormat::from_path(path))
        .with_context(|| format!("failed to parse transcript: {}", path.display()))?;
    config.check_ceiling(transcript.puzzle.disks)?;
    let roles = transcript.roles()?;

    let result = verify_sequence(transcript.puzzle.disks, roles, transcript.moves);
    match &result {
        Ok(report) => tracing::info!(
            disks = transcript.puzzle.disks,
            moves = report.moves_applied,
            optimal = report.optimal,
            "transcript verified"
        ),
        Err(e) => tracing::warn!(error = %e, "transcript rejected"),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hanoi_core::{Roles, Transcript};

    use super::*;

    fn config() -> HanoiConfig {
        HanoiConfig {
            step_delay: Duration::ZERO,
            max_disks: 10,
        }
    }

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn planned_transcript_is_optimal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let toml = Transcript::from_plan(5, Roles::STANDARD)
            .unwrap()
            .to_toml_string()
            .unwrap();
        let path = write(&tmp, "five.toml", &toml);

        let report = verify_file(&path, &config()).unwrap().unwrap();
        assert_eq!(report.moves_applied, 31);
        assert!(report.optimal);
    }

    #[test]
    fn unfinished_transcript_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write(
            &tmp,
            "short.json",
            r#"{"moves": [["A", "B"]], "puzzle": {"disks": 2}}"#,
        );

        let err = verify_file(&path, &config()).unwrap().unwrap_err();
        assert!(matches!(err, VerifyError::NotTerminal { moves_applied: 1, .. }));
    }

    #[test]
    fn illegal_move_names_its_step() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write(
            &tmp,
            "bad.toml",
            "moves = [[\"B\", \"C\"]]\n\n[puzzle]\ndisks = 1\n",
        );

        let err = verify_file(&path, &config()).unwrap().unwrap_err();
        assert!(matches!(err, VerifyError::Illegal { step: 1, .. }));
    }

    #[test]
    fn unparseable_transcript_is_an_outer_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write(&tmp, "broken.toml", "moves = [[\"A\", \"A\"]]\n\n[puzzle]\ndisks = 1\n");

        let err = verify_file(&path, &config()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse transcript"));
    }

    #[test]
    fn oversized_disk_count_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write(&tmp, "huge.toml", "moves = []\n\n[puzzle]\ndisks = 4000000000\n");

        let err = verify_file(&path, &config()).unwrap_err();
        assert!(
            err.to_string().contains("exceeds the configured maximum of 10"),
            "unexpected error: {err}"
        );
    }
}
