use chrono::Local;

use crate::cli::Context;
use crate::error::Result;
use crate::source::{CsvSource, RecordSource, SampleSource};

pub fn run(ctx: &Context) -> Result<()> {
    let snapshot = SampleSource::new(Local::now().date_naive()).load()?;
    let target = CsvSource::new(ctx.data_dir());
    target.save(&snapshot)?;

    println!("Sample data written to {}", target.dir().display());
    println!("  Employees:          {}", snapshot.costs.len());
    println!("  Payroll periods:    {}", snapshot.periods.len());
    println!("  Cash advances:      {}", snapshot.advances.len());
    println!("  Salary components:  {}", snapshot.components.len());
    println!("  Remittances:        {}", snapshot.remittances.len());
    println!();
    println!("Try `paylens report departments` or `paylens calendar`.");
    Ok(())
}
