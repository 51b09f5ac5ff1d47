// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   train        — TrainUseCase, then prints the test metrics
//   predict      — PredictUseCase on one record
//   interactive  — PredictUseCase behind a dialoguer form
//
// Artifact problems surface before any input is read: predict
// and interactive both open (and validate) the artifacts first.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;
pub mod form;

use std::fs;

use anyhow::{bail, Context, Result};
use clap::Parser;
use commands::{Commands, InteractiveArgs, PredictArgs, TrainArgs};
use serde_json::json;

use crate::application::{
    predict_use_case::PredictUseCase,
    train_use_case::TrainUseCase,
};
use crate::domain::{
    prediction::Attrition,
    record::{EmployeeRecord, RawValue},
};

#[derive(Parser, Debug)]
#[command(
    name = "attrition-predictor",
    version,
    about = "Train an employee attrition classifier on HR data, then predict from the terminal."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the use case; nothing is computed here.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)       => run_train(args),
            Commands::Predict(args)     => run_predict(args),
            Commands::Interactive(args) => run_interactive(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    let use_case = TrainUseCase::new(args.into());
    let report = use_case.execute()?;

    println!("\n{report}");
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let use_case = PredictUseCase::open(&args.artifact_dir)?;
    let record = build_record(&args)?;
    let prediction = use_case.predict(&record)?;

    if args.json {
        let out = json!({
            "attrition":              prediction.label == Attrition::Yes,
            "label":                  prediction.label.to_string(),
            "probability_of_leaving": prediction.probability_of_leaving(),
            "confidence":             prediction.confidence(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", form::render_prediction(&prediction));
    }
    Ok(())
}

fn run_interactive(args: InteractiveArgs) -> Result<()> {
    let use_case = PredictUseCase::open(&args.artifact_dir)?;
    form::run_form(&use_case)
}

/// `--record` file first, then `--set` pairs on top.
fn build_record(args: &PredictArgs) -> Result<EmployeeRecord> {
    let mut record = match &args.record {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Cannot read record file '{}'", path.display()))?;
            serde_json::from_str::<EmployeeRecord>(&text)
                .with_context(|| format!("'{}' is not a JSON object of field values", path.display()))?
        }
        None => EmployeeRecord::new(),
    };

    for assignment in &args.assignments {
        let (field, value) = parse_assignment(assignment)?;
        record.set(field, value);
    }
    if record.is_empty() {
        tracing::info!("No fields given; every field takes its form default");
    }
    Ok(record)
}

fn parse_assignment(text: &str) -> Result<(String, RawValue)> {
    let Some((field, value)) = text.split_once('=') else {
        bail!("Expected FIELD=VALUE, got '{text}'");
    };
    let field = field.trim();
    if field.is_empty() {
        bail!("Missing field name in '{text}'");
    }
    Ok((field.to_string(), RawValue::parse(value)))
}
