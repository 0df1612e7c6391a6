use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::aggregate::{self, AgencyTotal, DepartmentCost, PositionCost};
use crate::calendar::{self, MonthCursor, MonthGrid};
use crate::models::{
    CashAdvance, CostField, CostRecord, PeriodSpan, Remittance, SalaryComponent, Snapshot,
};
use crate::search;
use crate::stats::{self, CostDispersion};
use crate::variance::{self, VarianceReport};

/// State behind the payroll dashboard: one immutable snapshot of records,
/// the transient view state, and memoized summaries of the snapshot.
///
/// Summaries are computed on first use and dropped whenever a new snapshot
/// is installed. View state changes never invalidate them.
pub struct Dashboard {
    snapshot: Arc<Snapshot>,
    search: String,
    expanded: BTreeSet<String>,
    selected: BTreeSet<String>,
    cursor: MonthCursor,
    departments: OnceCell<Vec<DepartmentCost>>,
    positions: OnceCell<Vec<PositionCost>>,
    variance: OnceCell<VarianceReport>,
    remittances: OnceCell<Vec<AgencyTotal>>,
}

impl Dashboard {
    pub fn new(snapshot: Arc<Snapshot>, cursor: MonthCursor) -> Self {
        Self {
            snapshot,
            search: String::new(),
            expanded: BTreeSet::new(),
            selected: BTreeSet::new(),
            cursor,
            departments: OnceCell::new(),
            positions: OnceCell::new(),
            variance: OnceCell::new(),
            remittances: OnceCell::new(),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Install fresh data, as after a server round-trip. Selections that no
    /// longer exist are dropped; search text and calendar month are kept.
    pub fn replace_snapshot(&mut self, snapshot: Arc<Snapshot>) {
        debug!("replacing snapshot, clearing memoized summaries");
        self.snapshot = snapshot;
        self.departments = OnceCell::new();
        self.positions = OnceCell::new();
        self.variance = OnceCell::new();
        self.remittances = OnceCell::new();
        let ids: BTreeSet<&str> = self
            .snapshot
            .costs
            .iter()
            .map(|r| r.entity_id.as_str())
            .collect();
        self.selected.retain(|id| ids.contains(id.as_str()));
    }

    // -- view state ---------------------------------------------------------

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Flip a row open or closed; returns the new state.
    pub fn toggle_expanded(&mut self, key: &str) -> bool {
        if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.to_string());
            true
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    pub fn toggle_selected(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn set_month(&mut self, cursor: MonthCursor) {
        self.cursor = cursor;
    }

    pub fn prev_month(&mut self) {
        self.cursor = self.cursor.prev();
    }

    pub fn next_month(&mut self) {
        self.cursor = self.cursor.next();
    }

    // -- selectors ----------------------------------------------------------

    pub fn department_costs(&self) -> &[DepartmentCost] {
        self.departments
            .get_or_init(|| aggregate::department_costs(&self.snapshot.costs))
    }

    pub fn position_costs(&self) -> &[PositionCost] {
        self.positions
            .get_or_init(|| aggregate::position_costs(&self.snapshot.costs))
    }

    /// Highest average cost first, at most `limit` rows.
    pub fn top_positions(&self, limit: usize) -> Vec<PositionCost> {
        aggregate::top_positions_by_average(&self.snapshot.costs, limit)
    }

    pub fn variance(&self) -> &VarianceReport {
        self.variance
            .get_or_init(|| variance::group_variance(&self.snapshot.costs))
    }

    pub fn remittance_totals(&self) -> &[AgencyTotal] {
        self.remittances
            .get_or_init(|| aggregate::remittance_totals(&self.snapshot.remittances))
    }

    /// Always over the full record set, whatever the search box says.
    pub fn dispersion(&self, field: CostField) -> CostDispersion {
        stats::cost_dispersion(&self.snapshot.costs, field)
    }

    pub fn filtered_costs(&self) -> Vec<&CostRecord> {
        search::filter(&self.snapshot.costs, &self.search)
    }

    /// Department roll-up of the rows matching the search box. Member
    /// indices refer to `filtered_costs()`.
    pub fn filtered_department_costs(&self) -> Vec<DepartmentCost> {
        if self.search.is_empty() {
            return self.department_costs().to_vec();
        }
        aggregate::department_costs(&self.filtered_costs())
    }

    pub fn filtered_advances(&self) -> Vec<&CashAdvance> {
        search::filter(&self.snapshot.advances, &self.search)
    }

    pub fn filtered_components(&self) -> Vec<&SalaryComponent> {
        search::filter(&self.snapshot.components, &self.search)
    }

    pub fn filtered_remittances(&self) -> Vec<&Remittance> {
        search::filter(&self.snapshot.remittances, &self.search)
    }

    pub fn calendar(&self) -> MonthGrid<'_> {
        calendar::month_grid(self.cursor, &self.snapshot.periods)
    }

    pub fn periods_this_month(&self) -> Vec<&PeriodSpan> {
        calendar::periods_starting_in(self.cursor, &self.snapshot.periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{RecordSource, SampleSource};
    use chrono::NaiveDate;

    fn dashboard() -> Dashboard {
        let today = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
        let snapshot = SampleSource::new(today).load().unwrap();
        Dashboard::new(Arc::new(snapshot), MonthCursor::new(2024, 3).unwrap())
    }

    #[test]
    fn test_selectors_are_memoized_until_snapshot_changes() {
        let mut dash = dashboard();
        let first = dash.department_costs().as_ptr();
        dash.set_search("santos");
        assert_eq!(dash.department_costs().as_ptr(), first);
        assert_eq!(dash.department_costs().len(), 4);

        let mut smaller = dash.snapshot().clone();
        smaller.costs.retain(|r| r.department_id == "D-IT");
        dash.replace_snapshot(Arc::new(smaller));
        assert_eq!(dash.department_costs().len(), 1);
        assert_eq!(dash.variance().groups.len(), 1);
    }

    #[test]
    fn test_search_filters_rows_but_not_dispersion() {
        let mut dash = dashboard();
        let all = dash.dispersion(CostField::CostToCompany);
        dash.set_search("warehouse");
        assert_eq!(dash.filtered_costs().len(), 2);
        assert_eq!(dash.dispersion(CostField::CostToCompany), all);
        let depts = dash.filtered_department_costs();
        assert_eq!(depts.len(), 1);
        assert_eq!(depts[0].department_id, "D-OPS");
        assert_eq!(depts[0].headcount, 2);
    }

    #[test]
    fn test_empty_search_shows_everything() {
        let dash = dashboard();
        assert_eq!(dash.filtered_costs().len(), dash.snapshot().costs.len());
        assert_eq!(dash.filtered_department_costs(), dash.department_costs().to_vec());
        assert_eq!(dash.filtered_advances().len(), 4);
    }

    #[test]
    fn test_expand_and_select_toggle() {
        let mut dash = dashboard();
        assert!(dash.toggle_expanded("D-FIN"));
        assert!(dash.is_expanded("D-FIN"));
        assert!(!dash.toggle_expanded("D-FIN"));
        assert!(!dash.is_expanded("D-FIN"));

        assert!(dash.toggle_selected("EMP-0001"));
        assert!(dash.toggle_selected("EMP-0010"));
        assert_eq!(dash.selected().collect::<Vec<_>>(), vec!["EMP-0001", "EMP-0010"]);

        let mut it_only = dash.snapshot().clone();
        it_only.costs.retain(|r| r.department_id == "D-IT");
        dash.replace_snapshot(Arc::new(it_only));
        assert_eq!(dash.selected().collect::<Vec<_>>(), vec!["EMP-0010"]);
        dash.clear_selection();
        assert_eq!(dash.selected().count(), 0);
    }

    #[test]
    fn test_calendar_navigation() {
        let mut dash = dashboard();
        assert_eq!(dash.periods_this_month().len(), 2);
        dash.next_month();
        assert_eq!(dash.cursor(), MonthCursor::new(2024, 4).unwrap());
        assert_eq!(dash.periods_this_month().len(), 2);
        dash.next_month();
        assert!(dash.periods_this_month().is_empty());
        dash.set_month(MonthCursor::new(2024, 1).unwrap());
        dash.prev_month();
        assert_eq!(dash.cursor(), MonthCursor::new(2023, 12).unwrap());
        assert_eq!(dash.calendar().days.len() % 7, 0);
    }
}
