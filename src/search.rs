use crate::models::{CashAdvance, CostRecord, Remittance, SalaryComponent};

/// Records that can be found by the search box. Each kind exposes a fixed
/// set of text fields.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for CostRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.entity_name.as_str(),
            self.entity_id.as_str(),
            self.department_name.as_str(),
            self.position.as_str(),
        ]
    }
}

impl Searchable for CashAdvance {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.employee_name.as_str(),
            self.employee_number.as_str(),
            self.advance_number.as_str(),
        ]
    }
}

impl Searchable for SalaryComponent {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.code.as_str()]
    }
}

impl Searchable for Remittance {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.reference_number.as_str(),
            self.agency.key(),
            self.period_label.as_str(),
        ]
    }
}

/// Case-insensitive substring match against any search field. The term is
/// used as typed: no trimming, no tokenizing.
pub fn matches<T: Searchable>(record: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter<'a, T: Searchable>(records: &'a [T], term: &str) -> Vec<&'a T> {
    records.iter().filter(|r| matches(*r, term)).collect()
}
