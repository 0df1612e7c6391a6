pub mod advance;
pub mod calendar;
pub mod demo;
pub mod init;
pub mod report;
pub mod search;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::calendar::MonthCursor;
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::settings::{self, Settings};
use crate::source::{CsvSource, RecordSource};

#[derive(Parser)]
#[command(name = "paylens", about = "Payroll cost analytics: roll-ups, variance and pay calendars.")]
pub struct Cli {
    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding the CSV snapshot (overrides settings)
    #[arg(long = "data-dir", env = "PAYLENS_DATA_DIR", global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save settings and create the data directory.
    Init {
        /// Company name shown on report headers
        #[arg(long)]
        company: Option<String>,
    },
    /// Write a sample data set into the data directory.
    Demo,
    /// Show settings and record counts.
    Status,
    /// Cost and remittance reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Search one kind of record by name, number or code.
    Search {
        /// Record kind: costs, advances, components, remittances
        kind: String,
        /// Case-insensitive text to look for (empty shows all)
        #[arg(default_value = "")]
        term: String,
    },
    /// Show the pay calendar for a month.
    Calendar {
        /// Month: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
        /// Show the month before
        #[arg(long, conflicts_with = "next")]
        prev: bool,
        /// Show the month after
        #[arg(long)]
        next: bool,
    },
    /// Cash advances and loans.
    Advance {
        #[command(subcommand)]
        command: AdvanceCommands,
    },
}

#[derive(Args, Clone, Copy)]
pub struct OutputArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Headcount and cost per department.
    Departments {
        /// Only count employees matching this text
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Positions ranked by average cost.
    Positions {
        /// Number of positions to show (default from settings)
        #[arg(long)]
        top: Option<usize>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Budget vs actual per department.
    Variance {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Spread of one cost field across all employees.
    Dispersion {
        /// basic_salary, cost_to_company, budgeted, actual
        #[arg(long, default_value = "cost_to_company")]
        field: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Government remittance totals per agency.
    Remittances {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
pub enum AdvanceCommands {
    /// Validate a new cash advance or loan and queue it for submission.
    Submit {
        /// Employee number, e.g. EMP-0012
        #[arg(long)]
        employee: String,
        /// Total amount
        #[arg(long)]
        amount: f64,
        /// Deduction per payroll period
        #[arg(long)]
        amortization: f64,
        /// First deduction date: YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// cash_advance or loan
        #[arg(long, default_value = "cash_advance")]
        kind: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

/// Settings plus the data directory they resolve to.
pub struct Context {
    pub settings: Settings,
}

impl Context {
    pub fn new(data_dir: Option<&str>) -> Self {
        Self {
            settings: settings::resolve(data_dir),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.settings.data_dir)
    }

    pub fn money(&self, val: f64) -> String {
        crate::fmt::money(val, &self.settings.currency_symbol)
    }

    pub fn dashboard(&self, cursor: MonthCursor) -> Result<Dashboard> {
        let snapshot = CsvSource::new(self.data_dir()).load()?;
        Ok(Dashboard::new(Arc::new(snapshot), cursor))
    }
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
