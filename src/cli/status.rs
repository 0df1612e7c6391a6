use crate::cli::Context;
use crate::error::Result;
use crate::settings::settings_file_exists;
use crate::source::{CsvSource, RecordSource};

pub fn run(ctx: &Context) -> Result<()> {
    let settings = &ctx.settings;
    let data_dir = ctx.data_dir();

    println!("Company:    {}", if settings.company_name.is_empty() { "(not set)" } else { settings.company_name.as_str() });
    println!("Data dir:   {}", data_dir.display());
    println!("Currency:   {}", settings.currency_symbol);
    if !settings_file_exists() {
        println!("Settings:   defaults (run `paylens init` to save)");
    }

    if !data_dir.exists() {
        println!();
        println!("Data directory not found. Run `paylens init` or `paylens demo` to set up.");
        return Ok(());
    }

    let snapshot = CsvSource::new(&data_dir).load()?;
    println!();
    println!("Employees:          {}", snapshot.costs.len());
    println!("Payroll periods:    {}", snapshot.periods.len());
    println!("Cash advances:      {}", snapshot.advances.len());
    println!("Salary components:  {}", snapshot.components.len());
    println!("Remittances:        {}", snapshot.remittances.len());
    Ok(())
}
