use std::borrow::Borrow;
use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::models::{CostField, CostRecord, Remittance};

// ---------------------------------------------------------------------------
// Generic roll-up
// ---------------------------------------------------------------------------

/// Aggregate for one distinct key. `members` are indices into the input
/// slice, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub name: String,
    pub members: Vec<usize>,
    pub total: f64,
    pub average: f64,
}

impl GroupSummary {
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// Total divided by count, or 0 for an empty group.
pub fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Group `records` by the `(key, name)` pair returned from `key_of`,
/// summing `value_of` per group. Groups come out in order of first
/// appearance and keep the first name seen for their key. Averages are
/// computed once every member has been folded in.
pub fn group_by<T, K, V>(records: &[T], key_of: K, value_of: V) -> Vec<GroupSummary>
where
    K: Fn(&T) -> (&str, &str),
    V: Fn(&T) -> f64,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupSummary> = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let (key, name) = key_of(record);
        let slot = match index.get(key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(GroupSummary {
                    key: key.to_string(),
                    name: name.to_string(),
                    members: Vec::new(),
                    total: 0.0,
                    average: 0.0,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        group.members.push(i);
        group.total += value_of(record);
    }

    for group in &mut groups {
        group.average = average(group.total, group.members.len());
    }
    groups
}

// ---------------------------------------------------------------------------
// Department costs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentCost {
    pub department_id: String,
    pub department_name: String,
    pub headcount: usize,
    pub total_basic_salary: f64,
    pub total_cost: f64,
    pub average_cost: f64,
    pub members: Vec<usize>,
}

/// Per-department roll-up. Accepts owned records or a filtered view of
/// borrowed ones; `members` index into whichever slice was passed.
pub fn department_costs<R: Borrow<CostRecord>>(records: &[R]) -> Vec<DepartmentCost> {
    let groups = group_by(
        records,
        |r| {
            let r: &CostRecord = r.borrow();
            (r.department_id.as_str(), r.department_name.as_str())
        },
        |r| Borrow::<CostRecord>::borrow(r).cost_to_company,
    );
    debug!(records = records.len(), departments = groups.len(), "grouped department costs");
    groups
        .into_iter()
        .map(|g| {
            let total_basic_salary: f64 = g
                .members
                .iter()
                .map(|&i| Borrow::<CostRecord>::borrow(&records[i]).basic_salary)
                .sum();
            DepartmentCost {
                headcount: g.count(),
                department_id: g.key,
                department_name: g.name,
                total_basic_salary,
                total_cost: g.total,
                average_cost: g.average,
                members: g.members,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Position costs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionCost {
    pub position: String,
    pub headcount: usize,
    pub total_cost: f64,
    pub average_cost: f64,
}

pub fn position_costs<R: Borrow<CostRecord>>(records: &[R]) -> Vec<PositionCost> {
    group_by(
        records,
        |r| {
            let r: &CostRecord = r.borrow();
            (r.position.as_str(), r.position.as_str())
        },
        |r| Borrow::<CostRecord>::borrow(r).cost_to_company,
    )
    .into_iter()
    .map(|g| PositionCost {
        headcount: g.count(),
        position: g.key,
        total_cost: g.total,
        average_cost: g.average,
    })
    .collect()
}

/// Positions ranked by average cost, highest first, keeping input order for
/// ties, cut to `limit`. NaN averages sort after every number.
pub fn top_positions_by_average<R: Borrow<CostRecord>>(
    records: &[R],
    limit: usize,
) -> Vec<PositionCost> {
    let mut positions = position_costs(records);
    positions.sort_by(|a, b| {
        match (a.average_cost.is_nan(), b.average_cost.is_nan()) {
            (false, false) => b.average_cost.total_cmp(&a.average_cost),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        }
    });
    positions.truncate(limit);
    positions
}

/// Sum of one amount field across all records.
pub fn field_total(records: &[CostRecord], field: CostField) -> f64 {
    records.iter().map(|r| field.value(r)).sum()
}

// ---------------------------------------------------------------------------
// Remittances
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyTotal {
    pub agency: String,
    pub name: String,
    pub count: usize,
    pub total: f64,
    pub average: f64,
}

pub fn remittance_totals(remittances: &[Remittance]) -> Vec<AgencyTotal> {
    group_by(
        remittances,
        |r| (r.agency.key(), r.agency.name()),
        |r| r.amount,
    )
    .into_iter()
    .map(|g| AgencyTotal {
        count: g.count(),
        agency: g.key,
        name: g.name,
        total: g.total,
        average: g.average,
    })
    .collect()
}
