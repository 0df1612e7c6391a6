use serde::Serialize;

use crate::models::{CostField, CostRecord};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation, `sqrt(mean((x - mean)^2))`. `None` for an
/// empty set.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let squared: Vec<f64> = values.iter().map(|x| (x - m).powi(2)).collect();
    mean(&squared).map(f64::sqrt)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostDispersion {
    pub field: CostField,
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub std_dev: Option<f64>,
}

/// Spread of one amount field. Callers pass the full record set, not a
/// search-filtered view.
pub fn cost_dispersion(records: &[CostRecord], field: CostField) -> CostDispersion {
    let values: Vec<f64> = records.iter().map(|r| field.value(r)).collect();
    CostDispersion {
        field,
        count: values.len(),
        mean: mean(&values),
        min: values.iter().copied().reduce(f64::min),
        max: values.iter().copied().reduce(f64::max),
        std_dev: population_std_dev(&values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_formula() {
        // Classic example: mean 5, population std dev 2.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        assert_eq!(population_std_dev(&values), Some(2.0));
    }

    #[test]
    fn test_single_value_has_zero_spread() {
        assert_eq!(population_std_dev(&[42_000.0]), Some(0.0));
    }

    #[test]
    fn test_empty_input_does_not_panic() {
        assert_eq!(mean(&[]), None);
        assert_eq!(population_std_dev(&[]), None);
        let d = cost_dispersion(&[], CostField::CostToCompany);
        assert_eq!(d.count, 0);
        assert!(d.std_dev.is_none());
        assert!(d.min.is_none());
    }

    #[test]
    fn test_cost_dispersion_uses_field() {
        let rec = |basic: f64, ctc: f64| CostRecord {
            entity_id: "E".to_string(),
            entity_name: "E".to_string(),
            department_id: "D".to_string(),
            department_name: "D".to_string(),
            position: "P".to_string(),
            basic_salary: basic,
            cost_to_company: ctc,
            budgeted: 0.0,
            actual: 0.0,
        };
        let records = vec![rec(10.0, 100.0), rec(30.0, 100.0)];
        let basic = cost_dispersion(&records, CostField::BasicSalary);
        assert_eq!(basic.mean, Some(20.0));
        assert_eq!(basic.std_dev, Some(10.0));
        assert_eq!(basic.min, Some(10.0));
        assert_eq!(basic.max, Some(30.0));
        let ctc = cost_dispersion(&records, CostField::CostToCompany);
        assert_eq!(ctc.std_dev, Some(0.0));
    }
}
