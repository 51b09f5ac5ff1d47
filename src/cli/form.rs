// ============================================================
// Layer 1 — Interactive Employee Form
// ============================================================
// A terminal stand-in for a web form: one menu, every field
// editable, a Predict action.
//
//   FormSession owns the record being edited and the session
//   state; run_form only draws prompts and forwards choices to it.
//
//   Idle ──Predict──▶ Computing ──▶ ResultDisplayed | ErrorDisplayed
//     ▲                                      │
//     └──────────── any field edit ──────────┘
//
// Prediction errors are shown inline; the session keeps going.

use anyhow::Result;
use dialoguer::{
    console::{style, Style},
    theme::ColorfulTheme,
    Input, Select,
};

use crate::application::predict_use_case::PredictUseCase;
use crate::domain::{
    prediction::{Attrition, Prediction},
    record::{EmployeeRecord, RawValue},
    schema::{default_record, FieldKind, FieldSpec, FIELDS},
    session::SessionState,
};

pub struct FormSession<'a> {
    use_case: &'a PredictUseCase,
    record:   EmployeeRecord,
    state:    SessionState,
}

impl<'a> FormSession<'a> {
    pub fn new(use_case: &'a PredictUseCase) -> Self {
        Self { use_case, record: default_record(), state: SessionState::Idle }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current value of a field, or its default if unset.
    pub fn value(&self, spec: &FieldSpec) -> RawValue {
        self.record.get(spec.name).cloned().unwrap_or_else(|| spec.default_value())
    }

    /// Change one field. An out-of-range value is refused and the
    /// record is left as it was.
    pub fn set(&mut self, spec: &FieldSpec, value: RawValue) -> Result<(), String> {
        spec.check(&value)?;
        self.record.set(spec.name, value);
        self.state.edit();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.record = default_record();
        self.state.edit();
    }

    pub fn predict(&mut self) -> &SessionState {
        self.state.submit();
        let outcome = self.use_case.predict(&self.record).map_err(|e| format!("{e:#}"));
        self.state.finish(outcome);
        &self.state
    }
}

/// The result block shown after Predict.
pub fn render_prediction(p: &Prediction) -> String {
    match p.label {
        Attrition::Yes => format!(
            "Prediction: Employee is LIKELY to leave ({})\n\
             Confidence Score (Probability of Leaving): {:.2}\n\
             Consider implementing retention strategies for employees with similar profiles.",
            p.label,
            p.probabilities[1]
        ),
        Attrition::No => format!(
            "Prediction: Employee is UNLIKELY to leave ({})\n\
             Confidence Score (Probability of Staying): {:.2}\n\
             The model predicts this employee profile is likely to be retained.",
            p.label,
            p.probabilities[0]
        ),
    }
}

pub fn render_state(state: &SessionState) -> String {
    match state {
        SessionState::Idle => {
            "Choose 'Predict attrition' after adjusting the employee details.".to_string()
        }
        SessionState::Computing => "Computing...".to_string(),
        SessionState::ResultDisplayed(p) => render_prediction(p),
        SessionState::ErrorDisplayed(msg) => format!(
            "An error occurred during prediction: {msg}\n\
             Please ensure all inputs are valid and the model artifacts were loaded correctly."
        ),
    }
}

fn theme() -> ColorfulTheme {
    ColorfulTheme {
        active_item_prefix: style("  ›".to_string()).for_stderr().cyan(),
        active_item_style: Style::new().for_stderr().white().bold(),
        inactive_item_prefix: style("   ".to_string()).for_stderr(),
        ..ColorfulTheme::default()
    }
}

/// Run the form until the user quits (Esc on the main menu counts).
pub fn run_form(use_case: &PredictUseCase) -> Result<()> {
    let theme = theme();
    let mut session = FormSession::new(use_case);

    println!();
    println!("  {}", style("Employee Attrition Predictor").bold());
    if let Some(report) = &use_case.artifacts().report {
        let auc = report.auc_roc.map_or("n/a".to_string(), |a| format!("{a:.2}"));
        println!(
            "  {}",
            style(format!("held-out accuracy {:.2}, AUC-ROC {auc}", report.accuracy)).dim()
        );
    }
    println!("  {}", style(render_state(session.state())).dim());

    loop {
        let items = [
            "Edit a field",
            "Predict attrition",
            "Show current values",
            "Reset to defaults",
            "Quit",
        ];
        println!();
        let sel = Select::with_theme(&theme)
            .with_prompt("What would you like to do")
            .items(&items)
            .default(0)
            .interact_opt()?;

        match sel {
            Some(0) => edit_field(&theme, &mut session)?,
            Some(1) => {
                let text = render_state(session.predict());
                let styled = match session.state() {
                    SessionState::ResultDisplayed(p) if p.label == Attrition::Yes => style(text).red().bold(),
                    SessionState::ResultDisplayed(_) => style(text).green().bold(),
                    _ => style(text).yellow(),
                };
                println!("\n{styled}");
            }
            Some(2) => print_values(&session),
            Some(3) => {
                session.reset();
                println!("  {}", style("All fields reset to their defaults.").dim());
            }
            Some(4) | None => break,
            _ => {}
        }
    }

    println!();
    println!(
        "  {}",
        style("This prediction is based on a statistical model and should be used as a guide, not a definitive outcome.").dim()
    );
    Ok(())
}

fn print_values(session: &FormSession<'_>) {
    let mut group = None;
    for spec in FIELDS.iter() {
        if group != Some(spec.group) {
            println!("\n  {}", style(spec.group).bold());
            group = Some(spec.group);
        }
        println!("    {:<50} {}", spec.label, session.value(spec));
    }
}

fn edit_field(theme: &ColorfulTheme, session: &mut FormSession<'_>) -> Result<()> {
    let labels: Vec<String> = FIELDS
        .iter()
        .map(|spec| format!("{:<50} {}", spec.label, session.value(spec)))
        .collect();
    let Some(idx) = Select::with_theme(theme)
        .with_prompt("Field")
        .items(&labels)
        .default(0)
        .max_length(15)
        .interact_opt()?
    else {
        return Ok(());
    };
    let spec = &FIELDS[idx];

    let value = match spec.kind {
        FieldKind::Slider { min, max, step, .. } => {
            let current = session.value(spec).to_string();
            let raw: String = Input::with_theme(theme)
                .with_prompt(format!("{} [{min}-{max}]", spec.label))
                .with_initial_text(current)
                .validate_with(move |input: &String| -> Result<(), String> {
                    spec.check(&RawValue::parse(input)).map_err(|_| {
                        if step > 1 {
                            format!("enter a whole number from {min} to {max} in steps of {step}")
                        } else {
                            format!("enter a whole number from {min} to {max}")
                        }
                    })
                })
                .interact_text()?;
            RawValue::parse(&raw)
        }
        FieldKind::Choice { options, .. } => {
            let current = session.value(spec).to_string();
            let default = options.iter().position(|o| *o == current).unwrap_or(0);
            match Select::with_theme(theme)
                .with_prompt(spec.label)
                .items(options)
                .default(default)
                .interact_opt()?
            {
                Some(i) => RawValue::from(options[i]),
                None => return Ok(()),
            }
        }
        FieldKind::NumericChoice { options, .. } => {
            let current = session.value(spec).to_string();
            let items: Vec<String> = options.iter().map(i64::to_string).collect();
            let default = items.iter().position(|o| *o == current).unwrap_or(0);
            match Select::with_theme(theme)
                .with_prompt(spec.label)
                .items(&items)
                .default(default)
                .interact_opt()?
            {
                Some(i) => RawValue::from(options[i]),
                None => return Ok(()),
            }
        }
    };

    if let Err(msg) = session.set(spec, value) {
        println!("  {}", style(msg).red());
    }
    Ok(())
}
