use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::calendar::MonthCursor;
use crate::error::Result;
use crate::models::{
    Agency, CashAdvance, ComponentType, CostRecord, PeriodSpan, PeriodStatus, Remittance,
    SalaryComponent, Snapshot,
};

pub const COSTS_FILE: &str = "costs.csv";
pub const PERIODS_FILE: &str = "periods.csv";
pub const ADVANCES_FILE: &str = "cash_advances.csv";
pub const COMPONENTS_FILE: &str = "salary_components.csv";
pub const REMITTANCES_FILE: &str = "remittances.csv";

/// Anything that can hand over a complete snapshot of records.
pub trait RecordSource {
    fn load(&self) -> Result<Snapshot>;
}

// ---------------------------------------------------------------------------
// CSV directory
// ---------------------------------------------------------------------------

pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every record kind to its CSV file, replacing what is there.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        write_csv(&self.dir.join(COSTS_FILE), &snapshot.costs)?;
        write_csv(&self.dir.join(PERIODS_FILE), &snapshot.periods)?;
        write_csv(&self.dir.join(ADVANCES_FILE), &snapshot.advances)?;
        write_csv(&self.dir.join(COMPONENTS_FILE), &snapshot.components)?;
        write_csv(&self.dir.join(REMITTANCES_FILE), &snapshot.remittances)?;
        info!(dir = %self.dir.display(), "wrote snapshot");
        Ok(())
    }
}

impl RecordSource for CsvSource {
    fn load(&self) -> Result<Snapshot> {
        let snapshot = Snapshot {
            costs: read_csv(&self.dir.join(COSTS_FILE))?,
            periods: read_csv(&self.dir.join(PERIODS_FILE))?,
            advances: read_csv(&self.dir.join(ADVANCES_FILE))?,
            components: read_csv(&self.dir.join(COMPONENTS_FILE))?,
            remittances: read_csv(&self.dir.join(REMITTANCES_FILE))?,
        };
        info!(
            dir = %self.dir.display(),
            costs = snapshot.costs.len(),
            periods = snapshot.periods.len(),
            advances = snapshot.advances.len(),
            components = snapshot.components.len(),
            remittances = snapshot.remittances.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

/// A missing file is an empty list.
fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "no file, treating as empty");
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(rows)
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

/// Fixed demonstration data, with pay periods laid out around `today`.
pub struct SampleSource {
    today: NaiveDate,
}

impl SampleSource {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

struct SampleEmployee {
    id: &'static str,
    name: &'static str,
    dept: (&'static str, &'static str),
    position: &'static str,
    basic: f64,
    budgeted: f64,
    actual: f64,
}

const FIN: (&str, &str) = ("D-FIN", "Finance");
const HR: (&str, &str) = ("D-HR", "Human Resources");
const OPS: (&str, &str) = ("D-OPS", "Operations");
const IT: (&str, &str) = ("D-IT", "Information Technology");

const EMPLOYEES: &[SampleEmployee] = &[
    SampleEmployee { id: "EMP-0001", name: "Maria Santos", dept: FIN, position: "Finance Manager", basic: 85_000.0, budgeted: 118_000.0, actual: 112_400.0 },
    SampleEmployee { id: "EMP-0002", name: "Jose Dela Cruz", dept: FIN, position: "Payroll Officer", basic: 38_000.0, budgeted: 52_000.0, actual: 54_150.0 },
    SampleEmployee { id: "EMP-0003", name: "Ana Reyes", dept: FIN, position: "Accounting Clerk", basic: 22_000.0, budgeted: 30_500.0, actual: 29_800.0 },
    SampleEmployee { id: "EMP-0004", name: "Ramon Bautista", dept: HR, position: "HR Manager", basic: 78_000.0, budgeted: 108_000.0, actual: 108_000.0 },
    SampleEmployee { id: "EMP-0005", name: "Liza Garcia", dept: HR, position: "Recruitment Specialist", basic: 32_000.0, budgeted: 44_000.0, actual: 47_900.0 },
    SampleEmployee { id: "EMP-0006", name: "Paolo Mendoza", dept: OPS, position: "Operations Supervisor", basic: 45_000.0, budgeted: 63_000.0, actual: 66_700.0 },
    SampleEmployee { id: "EMP-0007", name: "Grace Villanueva", dept: OPS, position: "Warehouse Associate", basic: 18_500.0, budgeted: 26_000.0, actual: 27_350.0 },
    SampleEmployee { id: "EMP-0008", name: "Mark Aquino", dept: OPS, position: "Warehouse Associate", basic: 18_500.0, budgeted: 26_000.0, actual: 25_100.0 },
    SampleEmployee { id: "EMP-0009", name: "Kristine Ramos", dept: OPS, position: "Driver", basic: 20_000.0, budgeted: 28_000.0, actual: 31_200.0 },
    SampleEmployee { id: "EMP-0010", name: "Carlo Navarro", dept: IT, position: "Software Engineer", basic: 72_000.0, budgeted: 100_000.0, actual: 96_500.0 },
    SampleEmployee { id: "EMP-0011", name: "Bea Castillo", dept: IT, position: "Software Engineer", basic: 68_000.0, budgeted: 95_000.0, actual: 95_000.0 },
    SampleEmployee { id: "EMP-0012", name: "Miguel Torres", dept: IT, position: "IT Support Specialist", basic: 30_000.0, budgeted: 42_000.0, actual: 40_300.0 },
];

/// Employer share of statutory contributions and benefits, roughly.
const EMPLOYER_LOAD: f64 = 0.12;

fn sample_costs() -> Vec<CostRecord> {
    EMPLOYEES
        .iter()
        .map(|e| CostRecord {
            entity_id: e.id.to_string(),
            entity_name: e.name.to_string(),
            department_id: e.dept.0.to_string(),
            department_name: e.dept.1.to_string(),
            position: e.position.to_string(),
            basic_salary: e.basic,
            cost_to_company: (e.basic * (1.0 + EMPLOYER_LOAD) * 100.0).round() / 100.0,
            budgeted: e.budgeted,
            actual: e.actual,
        })
        .collect()
}

/// Semi-monthly periods (1st-15th and 16th-end) from two months back to one
/// month ahead. Pay dates fall five days after each cut-off.
fn sample_periods(today: NaiveDate) -> Vec<PeriodSpan> {
    let current = MonthCursor::new(today.year(), today.month()).unwrap_or_else(|_| MonthCursor::current());
    let mut cursor = current.prev().prev();
    let mut periods = Vec::new();
    for _ in 0..4 {
        let first = cursor.first_day();
        let mid = first + Duration::days(14);
        let halves = [(first, mid), (mid + Duration::days(1), cursor.last_day())];
        for (n, (start, end)) in halves.into_iter().enumerate() {
            let pay_date = end + Duration::days(5);
            let status = if pay_date < today {
                PeriodStatus::Paid
            } else if end < today {
                PeriodStatus::Finalized
            } else if start <= today {
                PeriodStatus::Processing
            } else {
                PeriodStatus::Draft
            };
            periods.push(PeriodSpan {
                id: format!("PP-{cursor}-{}", n + 1),
                label: format!("{} ({})", cursor.title(), if n == 0 { "1st half" } else { "2nd half" }),
                start_date: start,
                end_date: end,
                pay_date,
                status,
            });
        }
        cursor = cursor.next();
    }
    periods
}

fn sample_advances() -> Vec<CashAdvance> {
    let advance = |number: &str, emp: &str, name: &str, amount: f64, amortization: f64, balance: f64, status: &str| {
        CashAdvance {
            advance_number: number.to_string(),
            employee_number: emp.to_string(),
            employee_name: name.to_string(),
            amount,
            amortization,
            balance,
            status: status.to_string(),
        }
    };
    vec![
        advance("CA-0001", "EMP-0003", "Ana Reyes", 10_000.0, 2_500.0, 5_000.0, "active"),
        advance("CA-0002", "EMP-0007", "Grace Villanueva", 6_000.0, 1_500.0, 0.0, "settled"),
        advance("CA-0003", "EMP-0009", "Kristine Ramos", 15_000.0, 2_500.0, 15_000.0, "pending"),
        advance("LN-0001", "EMP-0002", "Jose Dela Cruz", 50_000.0, 4_200.0, 33_200.0, "active"),
    ]
}

fn sample_components() -> Vec<SalaryComponent> {
    let component = |code: &str, name: &str, component_type, is_taxable, is_de_minimis, limit| SalaryComponent {
        code: code.to_string(),
        name: name.to_string(),
        component_type,
        is_taxable,
        is_de_minimis,
        limit,
    };
    vec![
        component("BASIC", "Basic Salary", ComponentType::Earning, true, false, None),
        component("RICE", "Rice Subsidy", ComponentType::Earning, false, true, Some(2_000.0)),
        component("LAUNDRY", "Laundry Allowance", ComponentType::Earning, false, true, Some(300.0)),
        component("MEDCASH", "Medical Cash Allowance", ComponentType::Earning, false, true, Some(1_500.0)),
        component("OT", "Overtime Pay", ComponentType::Earning, true, false, None),
        component("SSS", "SSS Contribution", ComponentType::Deduction, false, false, None),
        component("PHIC", "PhilHealth Contribution", ComponentType::Deduction, false, false, None),
        component("HDMF", "Pag-IBIG Contribution", ComponentType::Deduction, false, false, None),
        component("WTAX", "Withholding Tax", ComponentType::Deduction, false, false, None),
    ]
}

fn sample_remittances(today: NaiveDate) -> Vec<Remittance> {
    let last = MonthCursor::new(today.year(), today.month())
        .unwrap_or_else(|_| MonthCursor::current())
        .prev();
    let due_base = last.next().first_day();
    let entries: [(Agency, i64, f64); 4] = [
        (Agency::Sss, 10, 48_750.0),
        (Agency::Philhealth, 15, 26_400.0),
        (Agency::Pagibig, 10, 2_400.0),
        (Agency::Bir, 10, 91_320.55),
    ];
    entries
        .iter()
        .map(|&(agency, day, amount)| {
            let due_date = due_base + Duration::days(day - 1);
            Remittance {
                reference_number: format!("{}-{}", agency.key().to_uppercase(), last),
                agency,
                period_label: last.title(),
                amount,
                due_date,
                status: (if due_date < today { "paid" } else { "pending" }).to_string(),
            }
        })
        .collect()
}

impl RecordSource for SampleSource {
    fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            costs: sample_costs(),
            periods: sample_periods(self.today),
            advances: sample_advances(),
            components: sample_components(),
            remittances: sample_remittances(self.today),
        })
    }
}
