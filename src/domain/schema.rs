// ============================================================
// Layer 3 — Form Schema
// ============================================================
// The documented attribute table for the front end: every one
// of the 30 model features with its label, its form group, and
// either a bounded slider or an enumerated choice.
//
// This table documents what the form OFFERS. It does not decide
// category codes; those come from the persisted Encoding Table.
// At startup the front end checks that the two agree.

use std::fmt;

use crate::domain::record::{EmployeeRecord, RawValue};

/// The fixed left-to-right feature order of the model input.
/// Dataset column order after dropping identifier/constant
/// columns and the target.
pub const FEATURE_ORDER: [&str; 30] = [
    "Age",
    "BusinessTravel",
    "DailyRate",
    "Department",
    "DistanceFromHome",
    "Education",
    "EducationField",
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
    "OverTime",
    "PercentSalaryHike",
    "PerformanceRating",
    "RelationshipSatisfaction",
    "StockOptionLevel",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "WorkLifeBalance",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
];

/// Columns in the source CSV that carry no information for the model.
pub const IDENTIFIER_COLUMNS: [&str; 4] =
    ["EmployeeCount", "EmployeeNumber", "Over18", "StandardHours"];

/// Name of the label column in the source CSV.
pub const TARGET_COLUMN: &str = "Attrition";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Personal,
    Job,
    Compensation,
    Career,
    Travel,
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldGroup::Personal     => "Personal & General Info",
            FieldGroup::Job          => "Job & Role Details",
            FieldGroup::Compensation => "Compensation & Performance",
            FieldGroup::Career       => "Career & Experience",
            FieldGroup::Travel       => "Travel & Other",
        };
        f.write_str(name)
    }
}

/// How a field is entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Bounded integer input. `step` is the granularity a value must land on.
    Slider { min: i64, max: i64, default: i64, step: i64 },
    /// Enumerated category labels, passed to the Encoding Table.
    Choice { options: &'static [&'static str], default: &'static str },
    /// Enumerated numbers; the column is numeric in the dataset.
    NumericChoice { options: &'static [i64], default: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name:  &'static str,
    pub label: &'static str,
    pub group: FieldGroup,
    pub kind:  FieldKind,
}

impl FieldSpec {
    const fn slider(
        name: &'static str,
        label: &'static str,
        group: FieldGroup,
        min: i64,
        max: i64,
        default: i64,
    ) -> Self {
        Self { name, label, group, kind: FieldKind::Slider { min, max, default, step: 1 } }
    }

    const fn stepped(
        name: &'static str,
        label: &'static str,
        group: FieldGroup,
        min: i64,
        max: i64,
        default: i64,
        step: i64,
    ) -> Self {
        Self { name, label, group, kind: FieldKind::Slider { min, max, default, step } }
    }

    const fn choice(
        name: &'static str,
        label: &'static str,
        group: FieldGroup,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self { name, label, group, kind: FieldKind::Choice { options, default } }
    }

    const fn numeric_choice(
        name: &'static str,
        label: &'static str,
        group: FieldGroup,
        options: &'static [i64],
        default: i64,
    ) -> Self {
        Self { name, label, group, kind: FieldKind::NumericChoice { options, default } }
    }

    pub fn default_value(&self) -> RawValue {
        match self.kind {
            FieldKind::Slider { default, .. }        => RawValue::Number(default as f64),
            FieldKind::Choice { default, .. }        => RawValue::Category(default.to_string()),
            FieldKind::NumericChoice { default, .. } => RawValue::Number(default as f64),
        }
    }

    /// Check a raw value against the documented bounds or options.
    pub fn check(&self, value: &RawValue) -> Result<(), String> {
        match (self.kind, value) {
            (FieldKind::Slider { min, max, step, .. }, RawValue::Number(n)) => {
                if n.fract() != 0.0 || *n < min as f64 || *n > max as f64 {
                    return Err(format!(
                        "{} must be a whole number between {min} and {max}, got {n}",
                        self.name
                    ));
                }
                if (*n as i64 - min) % step != 0 {
                    return Err(format!("{} must move in steps of {step} from {min}, got {n}", self.name));
                }
                Ok(())
            }
            (FieldKind::NumericChoice { options, .. }, RawValue::Number(n)) => {
                if options.iter().any(|o| *o as f64 == *n) {
                    Ok(())
                } else {
                    Err(format!("{} must be one of {:?}, got {n}", self.name, options))
                }
            }
            (FieldKind::Choice { options, .. }, RawValue::Category(c)) => {
                if options.contains(&c.as_str()) {
                    Ok(())
                } else {
                    Err(format!("{} must be one of {:?}, got '{c}'", self.name, options))
                }
            }
            (FieldKind::Choice { .. }, RawValue::Number(n)) => {
                Err(format!("{} expects a category label, got the number {n}", self.name))
            }
            (_, RawValue::Category(c)) => {
                Err(format!("{} expects a number, got '{c}'", self.name))
            }
        }
    }
}

use FieldGroup::*;

/// The attribute table, grouped the way the form shows it.
pub static FIELDS: [FieldSpec; 30] = [
    FieldSpec::slider("Age", "Age", Personal, 18, 60, 35),
    FieldSpec::choice("Gender", "Gender", Personal, &["Male", "Female"], "Male"),
    FieldSpec::choice("MaritalStatus", "Marital Status", Personal, &["Married", "Single", "Divorced"], "Married"),
    FieldSpec::choice(
        "Department",
        "Department",
        Personal,
        &["Sales", "Research & Development", "Human Resources"],
        "Sales",
    ),
    FieldSpec::choice(
        "JobRole",
        "Job Role",
        Job,
        &[
            "Sales Executive",
            "Research Scientist",
            "Laboratory Technician",
            "Manufacturing Director",
            "Healthcare Representative",
            "Manager",
            "Sales Representative",
            "Research Director",
            "Human Resources",
        ],
        "Sales Executive",
    ),
    FieldSpec::slider("JobLevel", "Job Level", Job, 1, 5, 2),
    FieldSpec::slider("JobInvolvement", "Job Involvement (1:Low - 4:Very High)", Job, 1, 4, 3),
    FieldSpec::slider("JobSatisfaction", "Job Satisfaction (1:Low - 4:Very High)", Job, 1, 4, 3),
    FieldSpec::slider("EnvironmentSatisfaction", "Environment Satisfaction (1:Low - 4:Very High)", Job, 1, 4, 3),
    FieldSpec::slider("RelationshipSatisfaction", "Relationship Satisfaction (1:Low - 4:Very High)", Job, 1, 4, 3),
    FieldSpec::slider("WorkLifeBalance", "Work Life Balance (1:Bad - 4:Best)", Job, 1, 4, 3),
    FieldSpec::slider("DailyRate", "Daily Rate ($)", Compensation, 100, 1500, 800),
    FieldSpec::slider("HourlyRate", "Hourly Rate ($)", Compensation, 30, 100, 65),
    FieldSpec::stepped("MonthlyIncome", "Monthly Income ($)", Compensation, 1000, 20000, 5000, 100),
    FieldSpec::stepped("MonthlyRate", "Monthly Rate ($)", Compensation, 2000, 27000, 14000, 100),
    FieldSpec::slider("PercentSalaryHike", "Percent Salary Hike (%)", Compensation, 11, 25, 15),
    FieldSpec::numeric_choice("PerformanceRating", "Performance Rating (3:High, 4:Outstanding)", Compensation, &[3, 4], 3),
    FieldSpec::slider("StockOptionLevel", "Stock Option Level", Compensation, 0, 3, 1),
    FieldSpec::numeric_choice("Education", "Education Level (1:Below College - 5:Doctorate)", Career, &[1, 2, 3, 4, 5], 1),
    FieldSpec::choice(
        "EducationField",
        "Education Field",
        Career,
        &["Life Sciences", "Medical", "Marketing", "Technical Degree", "Human Resources", "Other"],
        "Life Sciences",
    ),
    FieldSpec::slider("NumCompaniesWorked", "Number of Companies Worked At", Career, 0, 9, 1),
    FieldSpec::slider("TotalWorkingYears", "Total Working Years", Career, 0, 40, 10),
    FieldSpec::slider("TrainingTimesLastYear", "Training Times Last Year", Career, 0, 6, 3),
    FieldSpec::slider("YearsAtCompany", "Years At Company", Career, 0, 40, 5),
    FieldSpec::slider("YearsInCurrentRole", "Years in Current Role", Career, 0, 18, 3),
    FieldSpec::slider("YearsSinceLastPromotion", "Years Since Last Promotion", Career, 0, 15, 1),
    FieldSpec::slider("YearsWithCurrManager", "Years With Current Manager", Career, 0, 17, 3),
    FieldSpec::choice(
        "BusinessTravel",
        "Business Travel Frequency",
        Travel,
        &["Non-Travel", "Travel_Rarely", "Travel_Frequently"],
        "Non-Travel",
    ),
    FieldSpec::slider("DistanceFromHome", "Distance From Home (miles)", Travel, 1, 30, 5),
    FieldSpec::choice("OverTime", "OverTime", Travel, &["Yes", "No"], "Yes"),
];

/// Look up a field by its dataset column name.
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

/// A record holding the documented default for every field.
pub fn default_record() -> EmployeeRecord {
    FIELDS
        .iter()
        .fold(EmployeeRecord::new(), |record, spec| record.with(spec.name, spec.default_value()))
}

/// Check every value in `record` against its field spec.
/// Unknown field names are rejected so a typo in `--set` is not
/// silently ignored.
pub fn check_record(record: &EmployeeRecord) -> Result<(), String> {
    for (name, value) in record.fields() {
        let spec = field(name).ok_or_else(|| {
            format!("'{name}' is not a model feature (expected one of: {})", FEATURE_ORDER.join(", "))
        })?;
        spec.check(value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fields_cover_feature_order_exactly() {
        let fields: HashSet<&str> = FIELDS.iter().map(|f| f.name).collect();
        let order: HashSet<&str> = FEATURE_ORDER.iter().copied().collect();
        assert_eq!(fields.len(), 30);
        assert_eq!(fields, order);
    }

    #[test]
    fn test_defaults_pass_their_own_checks() {
        let rec = default_record();
        assert_eq!(rec.len(), 30);
        assert!(check_record(&rec).is_ok());
    }

    #[test]
    fn test_age_bounds() {
        let age = field("Age").unwrap();
        assert!(age.check(&RawValue::Number(18.0)).is_ok());
        assert!(age.check(&RawValue::Number(60.0)).is_ok());
        assert!(age.check(&RawValue::Number(17.0)).is_err());
        assert!(age.check(&RawValue::Number(61.0)).is_err());
        assert!(age.check(&RawValue::Number(35.5)).is_err());
    }

    #[test]
    fn test_stepped_slider() {
        let income = field("MonthlyIncome").unwrap();
        assert!(income.check(&RawValue::Number(5000.0)).is_ok());
        assert!(income.check(&RawValue::Number(5050.0)).is_err());
    }

    #[test]
    fn test_choice_rejects_unknown_and_numbers() {
        let ot = field("OverTime").unwrap();
        assert!(ot.check(&RawValue::Category("No".into())).is_ok());
        assert!(ot.check(&RawValue::Category("Maybe".into())).is_err());
        assert!(ot.check(&RawValue::Number(1.0)).is_err());
    }

    #[test]
    fn test_numeric_choice() {
        let rating = field("PerformanceRating").unwrap();
        assert!(rating.check(&RawValue::Number(4.0)).is_ok());
        assert!(rating.check(&RawValue::Number(2.0)).is_err());
        assert!(matches!(rating.kind, FieldKind::NumericChoice { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let rec = EmployeeRecord::new().with("Salary", 10i64);
        let err = check_record(&rec).unwrap_err();
        assert!(err.contains("Salary"));
    }
}
