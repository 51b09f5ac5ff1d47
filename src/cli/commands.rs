// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands:
//   train        — fit the model on the HR CSV
//   predict      — score one employee from --set pairs / a JSON file
//   interactive  — terminal form with a Predict action
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::data::resample::Rebalance;
use crate::data::splitter::DEFAULT_SEED;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the attrition model on an HR CSV export
    Train(TrainArgs),

    /// Predict attrition for one employee
    Predict(PredictArgs),

    /// Fill in an employee form in the terminal and predict
    Interactive(InteractiveArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebalanceArg {
    /// Balanced class weights in the loss
    ClassWeight,
    /// Oversample the minority class with SMOTE
    Smote,
    /// Train on the data as-is
    None,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// HR CSV with a header row and an Attrition column
    #[arg(long, default_value = "data/Employee-Attrition.csv")]
    pub dataset: String,

    /// Where the model, scaler and encoding table are written
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Label column (two classes)
    #[arg(long, default_value = "Attrition")]
    pub target: String,

    /// Columns to drop before training (repeat or comma-separate)
    #[arg(
        long = "drop",
        value_delimiter = ',',
        default_values = ["EmployeeCount", "EmployeeNumber", "Over18", "StandardHours"]
    )]
    pub drop_columns: Vec<String>,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Seed for the split, the loader shuffle and SMOTE
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 0.01)]
    pub lr: f64,

    /// L2 penalty; 0 turns it off
    #[arg(long, default_value_t = 1e-4)]
    pub weight_decay: f64,

    /// How to deal with the minority class
    #[arg(long, value_enum, default_value_t = RebalanceArg::ClassWeight)]
    pub rebalance: RebalanceArg,

    /// Neighbours considered by SMOTE (with --rebalance smote)
    #[arg(long, default_value_t = 5)]
    pub smote_k: usize,
}

impl TrainArgs {
    fn rebalance(&self) -> Rebalance {
        match self.rebalance {
            RebalanceArg::ClassWeight => Rebalance::ClassWeight,
            RebalanceArg::Smote       => Rebalance::Smote { k: self.smote_k },
            RebalanceArg::None        => Rebalance::None,
        }
    }
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        let rebalance = a.rebalance();
        TrainConfig {
            dataset_path:  a.dataset,
            artifact_dir:  a.artifact_dir,
            target_column: a.target,
            drop_columns:  a.drop_columns,
            test_fraction: a.test_fraction,
            seed:          a.seed,
            epochs:        a.epochs,
            batch_size:    a.batch_size,
            learning_rate: a.lr,
            weight_decay:  a.weight_decay,
            rebalance,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory written by `train`
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Field=Value, e.g. --set Age=42 --set OverTime=Yes
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub assignments: Vec<String>,

    /// JSON object of field values; --set pairs override it
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Print the prediction as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InteractiveArgs {
    /// Directory written by `train`
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,
}
