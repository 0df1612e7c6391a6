use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::actions::{ActionKind, ActionRequest};

const NOTES_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceKind {
    CashAdvance,
    Loan,
}

impl AdvanceKind {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "cash_advance" => Some(Self::CashAdvance),
            "loan" => Some(Self::Loan),
            _ => None,
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            Self::CashAdvance => "/payroll/advances",
            Self::Loan => "/payroll/loans",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CashAdvance => "cash advance",
            Self::Loan => "loan",
        }
    }
}

/// Form state for a new cash advance or loan, as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceDraft {
    pub kind: AdvanceKind,
    pub employee_number: String,
    pub amount: f64,
    pub amortization: f64,
    pub start_date: String,
    pub notes: String,
}

/// Per-field messages shown inline under the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// A draft that passed validation, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidAdvance {
    pub request: ActionRequest,
    pub installments: u32,
}

pub fn validate_advance(draft: &AdvanceDraft) -> Result<ValidAdvance, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if draft.employee_number.trim().is_empty() {
        errors.add("employee_number", "Employee is required");
    }
    if !(draft.amount > 0.0) {
        errors.add("amount", "Amount must be greater than zero");
    } else if !draft.amount.is_finite() {
        errors.add("amount", "Amount must be a finite number");
    }
    if !(draft.amortization > 0.0) {
        errors.add("amortization", "Amortization must be greater than zero");
    } else if !draft.amortization.is_finite() {
        errors.add("amortization", "Amortization must be a finite number");
    } else if draft.amortization > draft.amount {
        errors.add("amortization", "Amortization cannot exceed the total amount");
    }

    let installments = (draft.amount / draft.amortization).ceil();
    let amounts_ok = errors.get("amount").is_none() && errors.get("amortization").is_none();
    if amounts_ok && !(installments <= f64::from(u32::MAX)) {
        errors.add("amortization", "Amortization is too small for the total amount");
    }

    let start = if draft.start_date.trim().is_empty() {
        errors.add("start_date", "Start date is required");
        None
    } else {
        match NaiveDate::parse_from_str(draft.start_date.trim(), "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                errors.add("start_date", "Start date must be YYYY-MM-DD");
                None
            }
        }
    };

    if draft.notes.chars().count() > NOTES_MAX_LEN {
        errors.add("notes", format!("Notes must be at most {NOTES_MAX_LEN} characters"));
    }

    match start {
        Some(start) if errors.is_empty() => {
            // Bounded by the checks above.
            let installments = installments as u32;
            let mut request = ActionRequest::new(ActionKind::Submit, draft.kind.route())
                .with("employee_number", draft.employee_number.trim())
                .with("amount", format!("{:.2}", draft.amount))
                .with("amortization", format!("{:.2}", draft.amortization))
                .with("start_date", start.format("%Y-%m-%d").to_string())
                .with("installments", installments.to_string());
            if !draft.notes.is_empty() {
                request = request.with("notes", draft.notes.as_str());
            }
            Ok(ValidAdvance {
                request,
                installments,
            })
        }
        _ => Err(errors),
    }
}
