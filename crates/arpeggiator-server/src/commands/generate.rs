//! Generate command implementation
//!
//! Runs the generation pipeline once and writes the MIDI file to disk.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use arpeggiator_llm::ModelConfig;
use arpeggiator_spec::{
    validate_request, FieldError, GenerationRequest, GenerationResponse, RequestLimits,
};
use colored::Colorize;
use serde::Serialize;

use crate::state::build_generator;

/// Inputs for one `arpeggiator generate` run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub request: GenerationRequest,
    /// Output path; defaults to the download file name in the current directory.
    pub output: Option<PathBuf>,
    pub model: Option<ModelConfig>,
    pub limits: RequestLimits,
    /// Print machine-readable JSON instead of colored text.
    pub json: bool,
}

/// JSON report printed with `--json`.
#[derive(Debug, Serialize)]
pub struct GenerateReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 success, 1 invalid parameters
pub fn run(options: &GenerateOptions) -> Result<ExitCode> {
    let start = Instant::now();

    let params = match validate_request(&options.request, &options.limits) {
        Ok(params) => params,
        Err(errors) => {
            let errors: Vec<FieldError> = errors.iter().map(FieldError::from).collect();
            if options.json {
                print_report(&GenerateReport {
                    success: false,
                    output: None,
                    seed: None,
                    hash: None,
                    result: None,
                    errors,
                })?;
            } else {
                for error in &errors {
                    eprintln!("{} {}", error.code.red().bold(), error.message);
                }
            }
            return Ok(ExitCode::from(1));
        }
    };

    let generator = build_generator(options.model.as_ref());
    let result = generator
        .generate(&params)
        .context("Failed to generate arpeggio")?;

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(params.midi_filename()));
    fs::write(&output, &result.midi)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if options.json {
        print_report(&GenerateReport {
            success: true,
            output: Some(output.display().to_string()),
            seed: Some(result.seed),
            hash: Some(result.hash.clone()),
            result: Some(result.to_response(&params)),
            errors: Vec::new(),
        })?;
    } else {
        println!("{} {}", "Generated:".green().bold(), output.display());
        println!("  {}", result.description);
        println!(
            "  {} notes, {:.2}s at {} bpm",
            result.notes.len(),
            result.duration,
            params.bpm
        );
        println!("  {} {}", "seed".dimmed(), result.seed);
        println!("  {} {}", "blake3".dimmed(), result.hash);
        println!("{}", format!("Done in {:.1?}", start.elapsed()).dimmed());
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &GenerateReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(request: GenerationRequest, output: PathBuf) -> GenerateOptions {
        GenerateOptions {
            request,
            output: Some(output),
            model: None,
            limits: RequestLimits::default(),
            json: true,
        }
    }

    #[test]
    fn test_writes_midi_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.mid");
        let request = GenerationRequest {
            pattern_style: "ascending".to_string(),
            seed: Some(42),
            ..GenerationRequest::default()
        };

        let code = run(&options(request, path.clone())).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"MThd");
    }

    #[test]
    fn test_invalid_request_exits_with_one_and_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.mid");
        let request = GenerationRequest {
            mood: "jazzy".to_string(),
            ..GenerationRequest::default()
        };

        let code = run(&options(request, path.clone())).unwrap();
        assert_eq!(code, ExitCode::from(1));
        assert!(!path.exists());
    }
}
