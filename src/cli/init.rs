use tracing::info;

use crate::cli::Context;
use crate::error::Result;
use crate::settings::save_settings;

pub fn run(ctx: Context, company: Option<String>) -> Result<()> {
    let mut settings = ctx.settings;
    if let Some(name) = company {
        settings.company_name = name;
    }
    save_settings(&settings)?;

    let dir = std::path::PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&dir)?;
    info!(data_dir = %dir.display(), "initialized");

    println!("Initialized paylens at {}", dir.display());
    Ok(())
}
