use serde::Serialize;

use crate::aggregate::group_by;
use crate::models::CostRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    Favorable,
    Unfavorable,
}

impl VarianceStatus {
    /// Spending at or under budget is favorable.
    pub fn classify(variance: f64) -> Self {
        if variance <= 0.0 {
            Self::Favorable
        } else {
            Self::Unfavorable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Favorable => "favorable",
            Self::Unfavorable => "unfavorable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceGroup {
    pub department_id: String,
    pub department_name: String,
    pub lines: usize,
    pub budgeted: f64,
    pub actual: f64,
    pub variance: f64,
    /// `variance / budgeted * 100`. Infinite or NaN when nothing was budgeted.
    pub variance_percent: f64,
    pub status: VarianceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceReport {
    pub groups: Vec<VarianceGroup>,
    pub total: VarianceGroup,
}

fn variance_percent(variance: f64, budgeted: f64) -> f64 {
    variance / budgeted * 100.0
}

fn variance_group(
    department_id: String,
    department_name: String,
    lines: &[&CostRecord],
    variance: f64,
) -> VarianceGroup {
    let budgeted: f64 = lines.iter().map(|r| r.budgeted).sum();
    let actual: f64 = lines.iter().map(|r| r.actual).sum();
    VarianceGroup {
        department_id,
        department_name,
        lines: lines.len(),
        budgeted,
        actual,
        variance,
        variance_percent: variance_percent(variance, budgeted),
        status: VarianceStatus::classify(variance),
    }
}

fn line_variance(record: &CostRecord) -> f64 {
    record.actual - record.budgeted
}

/// Budget vs actual per department, in order of first appearance, plus a
/// grand total across every record.
pub fn group_variance(records: &[CostRecord]) -> VarianceReport {
    let groups = group_by(
        records,
        |r| (r.department_id.as_str(), r.department_name.as_str()),
        line_variance,
    )
    .into_iter()
    .map(|g| {
        let lines: Vec<&CostRecord> = g.members.iter().map(|&i| &records[i]).collect();
        variance_group(g.key, g.name, &lines, g.total)
    })
    .collect();

    let all: Vec<&CostRecord> = records.iter().collect();
    let variance: f64 = records.iter().map(line_variance).sum();
    VarianceReport {
        groups,
        total: variance_group(String::new(), "Total".to_string(), &all, variance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(dept: &str, budgeted: f64, actual: f64) -> CostRecord {
        CostRecord {
            entity_id: format!("{dept}-{budgeted}"),
            entity_name: "Line".to_string(),
            department_id: dept.to_string(),
            department_name: format!("Dept {dept}"),
            position: "Staff".to_string(),
            basic_salary: 0.0,
            cost_to_company: 0.0,
            budgeted,
            actual,
        }
    }

    #[test]
    fn test_under_budget_is_favorable() {
        let report = group_variance(&[line("D1", 1000.0, 900.0)]);
        let g = &report.groups[0];
        assert_eq!(g.variance, -100.0);
        assert_eq!(g.variance_percent, -10.0);
        assert_eq!(g.status, VarianceStatus::Favorable);
    }

    #[test]
    fn test_exactly_on_budget_is_favorable() {
        let report = group_variance(&[line("D1", 500.0, 500.0)]);
        assert_eq!(report.groups[0].variance, 0.0);
        assert_eq!(report.groups[0].status, VarianceStatus::Favorable);
    }

    #[test]
    fn test_over_budget_is_unfavorable() {
        let report = group_variance(&[line("D1", 100.0, 80.0), line("D1", 100.0, 150.0)]);
        let g = &report.groups[0];
        assert_eq!(g.lines, 2);
        assert_eq!(g.budgeted, 200.0);
        assert_eq!(g.actual, 230.0);
        assert_eq!(g.variance, 30.0);
        assert_eq!(g.variance_percent, 15.0);
        assert_eq!(g.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_zero_budget_percent_is_not_finite() {
        let report = group_variance(&[line("D1", 0.0, 250.0), line("D2", 0.0, 0.0)]);
        assert!(report.groups[0].variance_percent.is_infinite());
        assert!(report.groups[1].variance_percent.is_nan());
    }

    #[test]
    fn test_groups_in_first_seen_order_with_total() {
        let report = group_variance(&[
            line("D2", 100.0, 90.0),
            line("D1", 200.0, 260.0),
            line("D2", 50.0, 50.0),
        ]);
        let ids: Vec<&str> = report.groups.iter().map(|g| g.department_id.as_str()).collect();
        assert_eq!(ids, vec!["D2", "D1"]);
        let d2 = &report.groups[0];
        assert_eq!((d2.lines, d2.budgeted, d2.actual, d2.variance), (2, 150.0, 140.0, -10.0));
        assert_eq!(report.total.lines, 3);
        assert_eq!(report.total.budgeted, 350.0);
        assert_eq!(report.total.variance, 50.0);
        assert_eq!(report.total.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_empty_input() {
        let report = group_variance(&[]);
        assert!(report.groups.is_empty());
        assert_eq!(report.total.lines, 0);
        assert_eq!(report.total.status, VarianceStatus::Favorable);
    }
}
