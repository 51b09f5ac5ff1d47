// Synthetic HR data for tests: every documented column, every form
// category present, and an attrition label that rises with overtime,
// low job satisfaction, youth and low income.

use std::{fs, path::Path};

use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::application::train_use_case::TrainConfig;
use crate::domain::schema::{field, FieldKind};

/// Header of the HR attrition CSV, in file order.
pub const DATASET_COLUMNS: [&str; 35] = [
    "Age",
    "Attrition",
    "BusinessTravel",
    "DailyRate",
    "Department",
    "DistanceFromHome",
    "Education",
    "EducationField",
    "EmployeeCount",
    "EmployeeNumber",
    "EnvironmentSatisfaction",
    "Gender",
    "HourlyRate",
    "JobInvolvement",
    "JobLevel",
    "JobRole",
    "JobSatisfaction",
    "MaritalStatus",
    "MonthlyIncome",
    "MonthlyRate",
    "NumCompaniesWorked",
    "Over18",
    "OverTime",
    "PercentSalaryHike",
    "PerformanceRating",
    "RelationshipSatisfaction",
    "StandardHours",
    "StockOptionLevel",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "WorkLifeBalance",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
];

fn is_text_column(name: &str) -> bool {
    match name {
        "Attrition" | "Over18" => true,
        _ => field(name).is_some_and(|f| matches!(f.kind, FieldKind::Choice { .. })),
    }
}

/// `rows` rows of cells, one Vec per row, in DATASET_COLUMNS order.
fn synthetic_cells(rows: usize, seed: u64) -> Vec<Vec<String>> {
    let position = |col: &str| DATASET_COLUMNS.iter().position(|c| *c == col).unwrap();
    let (attrition, overtime) = (position("Attrition"), position("OverTime"));
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(rows);

    for i in 0..rows {
        let mut row: Vec<String> = Vec::with_capacity(DATASET_COLUMNS.len());
        for name in DATASET_COLUMNS {
            let cell = match name {
                "Attrition"      => String::new(), // filled below
                "EmployeeCount"  => "1".to_string(),
                "StandardHours"  => "80".to_string(),
                "Over18"         => "Y".to_string(),
                "EmployeeNumber" => (i + 1).to_string(),
                _ => match field(name).map(|f| f.kind) {
                    Some(FieldKind::Slider { min, max, step, .. }) => {
                        let steps = (max - min) / step;
                        (min + step * rng.gen_range(0..=steps)).to_string()
                    }
                    // The first rows walk through every option so each one is seen.
                    Some(FieldKind::Choice { options, .. }) => {
                        let k = if i < options.len() { i } else { rng.gen_range(0..options.len()) };
                        options[k].to_string()
                    }
                    Some(FieldKind::NumericChoice { options, .. }) => {
                        let k = if i < options.len() { i } else { rng.gen_range(0..options.len()) };
                        options[k].to_string()
                    }
                    None => unreachable!("unknown column {name}"),
                },
            };
            row.push(cell);
        }

        let get = |col: &str| -> f64 { row[position(col)].parse().unwrap_or(0.0) };
        let worked_overtime = f64::from(u8::from(row[overtime] == "Yes"));
        let logit = -1.2 + 2.4 * worked_overtime - 0.9 * (get("JobSatisfaction") - 2.5)
            - 0.05 * (get("Age") - 39.0)
            - 0.00012 * (get("MonthlyIncome") - 10500.0);
        let p = 1.0 / (1.0 + (-logit).exp());
        row[attrition] = if rng.gen::<f64>() < p { "Yes" } else { "No" }.to_string();

        out.push(row);
    }
    out
}

/// The synthetic dataset as an in-memory table, typed the way the
/// CSV loader types it (String or Float64).
pub fn synthetic_table(rows: usize, seed: u64) -> DataFrame {
    let cells = synthetic_cells(rows, seed);
    let columns = DATASET_COLUMNS
        .iter()
        .enumerate()
        .map(|(c, name)| {
            if is_text_column(name) {
                let values: Vec<&str> = cells.iter().map(|r| r[c].as_str()).collect();
                Column::new((*name).into(), values)
            } else {
                let values: Vec<f64> = cells.iter().map(|r| r[c].parse().unwrap()).collect();
                Column::new((*name).into(), values)
            }
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

/// The same dataset written as CSV to `path`.
pub fn write_synthetic_csv(path: &Path, rows: usize, seed: u64) {
    let mut text = DATASET_COLUMNS.join(",");
    text.push('\n');
    for row in synthetic_cells(rows, seed) {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    fs::write(path, text).unwrap();
}

/// Write a synthetic CSV into `dir` and return a short training
/// config that reads it and writes artifacts to `dir/artifacts`.
pub fn quick_config(dir: &Path, rows: usize, seed: u64) -> TrainConfig {
    let csv = dir.join("hr.csv");
    write_synthetic_csv(&csv, rows, seed);
    TrainConfig {
        dataset_path: csv.to_string_lossy().into_owned(),
        artifact_dir: dir.join("artifacts").to_string_lossy().into_owned(),
        epochs: 30,
        batch_size: 32,
        learning_rate: 0.05,
        ..TrainConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_table_shape_and_labels() {
        let df = synthetic_table(120, 1);
        assert_eq!(df.width(), DATASET_COLUMNS.len());
        assert_eq!(df.height(), 120);

        let labels = df.column("Attrition").unwrap().str().unwrap();
        let leavers = labels.into_iter().filter(|v| *v == Some("Yes")).count();
        assert!(leavers > 0 && leavers < 120);
    }
}
