use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PaylensError, Result};

/// One employee's cost line. Loaded once, never mutated; every summary is
/// derived from a slice of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub entity_id: String,
    pub entity_name: String,
    pub department_id: String,
    pub department_name: String,
    pub position: String,
    #[serde(default)]
    pub basic_salary: f64,
    #[serde(default)]
    pub cost_to_company: f64,
    #[serde(default)]
    pub budgeted: f64,
    #[serde(default)]
    pub actual: f64,
}

/// Amount column selector for aggregation and dispersion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostField {
    BasicSalary,
    CostToCompany,
    Budgeted,
    Actual,
}

impl CostField {
    pub fn key(&self) -> &'static str {
        match self {
            Self::BasicSalary => "basic_salary",
            Self::CostToCompany => "cost_to_company",
            Self::Budgeted => "budgeted",
            Self::Actual => "actual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BasicSalary => "Basic Salary",
            Self::CostToCompany => "Cost to Company",
            Self::Budgeted => "Budgeted",
            Self::Actual => "Actual",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        match key {
            "basic_salary" => Ok(Self::BasicSalary),
            "cost_to_company" => Ok(Self::CostToCompany),
            "budgeted" => Ok(Self::Budgeted),
            "actual" => Ok(Self::Actual),
            other => Err(PaylensError::UnknownField(other.to_string())),
        }
    }

    pub fn value(&self, record: &CostRecord) -> f64 {
        match self {
            Self::BasicSalary => record.basic_salary,
            Self::CostToCompany => record.cost_to_company,
            Self::Budgeted => record.budgeted,
            Self::Actual => record.actual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Draft,
    Processing,
    Finalized,
    Paid,
}

impl PeriodStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Processing => "Processing",
            Self::Finalized => "Finalized",
            Self::Paid => "Paid",
        }
    }
}

/// A payroll period as shown on the pay calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSpan {
    pub id: String,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pay_date: NaiveDate,
    pub status: PeriodStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashAdvance {
    pub advance_number: String,
    pub employee_number: String,
    pub employee_name: String,
    pub amount: f64,
    pub amortization: f64,
    pub balance: f64,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Earning,
    Deduction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryComponent {
    pub code: String,
    pub name: String,
    pub component_type: ComponentType,
    #[serde(default)]
    pub is_taxable: bool,
    #[serde(default)]
    pub is_de_minimis: bool,
    /// Statutory ceiling for de minimis benefits, if any.
    #[serde(default)]
    pub limit: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Agency {
    Sss,
    Philhealth,
    Pagibig,
    Bir,
}

impl Agency {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Sss => "sss",
            Self::Philhealth => "philhealth",
            Self::Pagibig => "pagibig",
            Self::Bir => "bir",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sss => "SSS",
            Self::Philhealth => "PhilHealth",
            Self::Pagibig => "Pag-IBIG",
            Self::Bir => "BIR",
        }
    }
}

/// A scheduled government remittance and its payment tracking state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remittance {
    pub reference_number: String,
    pub agency: Agency,
    pub period_label: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: String,
}

/// Immutable bundle of every record kind, as handed over by a data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub costs: Vec<CostRecord>,
    pub periods: Vec<PeriodSpan>,
    pub advances: Vec<CashAdvance>,
    pub components: Vec<SalaryComponent>,
    pub remittances: Vec<Remittance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_field_keys_round_trip() {
        for field in [
            CostField::BasicSalary,
            CostField::CostToCompany,
            CostField::Budgeted,
            CostField::Actual,
        ] {
            assert_eq!(CostField::from_key(field.key()).unwrap(), field);
        }
    }

    #[test]
    fn test_cost_field_rejects_unknown() {
        let err = CostField::from_key("bonus").unwrap_err();
        assert!(err.to_string().contains("bonus"));
    }
}
