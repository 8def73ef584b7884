//! `hanoi plan` command: print or save the optimal move sequence.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use hanoi_core::{Plan, Transcript, check_disk_count};

use crate::config::HanoiConfig;
use crate::{PegArgs, PlanFormat};

/// Run the plan command.
pub fn run_plan(
    disks: i64,
    pegs: &PegArgs,
    format: PlanFormat,
    output: Option<&Path>,
    config: &HanoiConfig,
) -> Result<()> {
    let disks = check_disk_count(disks)?;
    config.check_ceiling(disks)?;
    let roles = pegs.roles()?;

    // Validate everything before touching the output file.
    let plan = Plan::new(disks, roles);
    let document = match format {
        PlanFormat::Text => None,
        PlanFormat::Toml => Some(Transcript::from_plan(disks, roles)?.to_toml_string()?),
        PlanFormat::Json => Some(Transcript::from_plan(disks, roles)?.to_json_string()?),
    };

    tracing::debug!(disks, ?format, "writing plan");

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_plan(&mut out, &plan, document.as_deref())
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {} moves to {}", plan.len().unwrap_or(0), path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            write_plan(&mut out, &plan, document.as_deref())?;
        }
    }

    Ok(())
}

fn write_plan(out: &mut impl Write, plan: &Plan, document: Option<&str>) -> Result<()> {
    match document {
        Some(doc) => {
            out.write_all(doc.as_bytes())?;
            if !doc.ends_with('\n') {
                out.write_all(b"\n")?;
            }
        }
        None => {
            for (i, mv) in plan.moves().enumerate() {
                writeln!(out, "{}. {mv}", i + 1)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hanoi_core::{Peg, TranscriptFormat, parse_transcript};

    use super::*;

    fn standard_pegs() -> PegArgs {
        PegArgs {
            source: Peg::A,
            auxiliary: Peg::B,
            destination: Peg::C,
        }
    }

    fn config(max_disks: u32) -> HanoiConfig {
        HanoiConfig {
            step_delay: Duration::ZERO,
            max_disks,
        }
    }

    #[test]
    fn text_plan_numbers_each_move() {
        let mut out = Vec::new();
        write_plan(&mut out, &Plan::new(2, Default::default()), None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1. A -> B\n2. A -> C\n3. B -> C\n"
        );
    }

    #[test]
    fn toml_output_file_parses_back() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("plan.toml");

        run_plan(3, &standard_pegs(), PlanFormat::Toml, Some(&path), &config(10)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let transcript = parse_transcript(&content, TranscriptFormat::Toml).unwrap();
        assert_eq!(transcript.puzzle.disks, 3);
        assert_eq!(transcript.moves.len(), 7);
    }

    #[test]
    fn json_output_file_parses_back() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("plan.json");

        run_plan(1, &standard_pegs(), PlanFormat::Json, Some(&path), &config(10)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let transcript = parse_transcript(&content, TranscriptFormat::Json).unwrap();
        assert_eq!(transcript.moves.len(), 1);
    }

    #[test]
    fn invalid_input_writes_nothing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("plan.toml");

        assert!(run_plan(-1, &standard_pegs(), PlanFormat::Toml, Some(&path), &config(10)).is_err());
        assert!(run_plan(11, &standard_pegs(), PlanFormat::Toml, Some(&path), &config(10)).is_err());

        let same = PegArgs {
            source: Peg::A,
            auxiliary: Peg::A,
            destination: Peg::C,
        };
        let err = run_plan(3, &same, PlanFormat::Toml, Some(&path), &config(10)).unwrap_err();
        assert!(err.to_string().contains("pairwise distinct"), "unexpected error: {err}");

        assert!(!path.exists());
    }
}
