mod db;
mod display;
mod logging;
mod models;
mod run;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    tracing::debug!(path = %db_path.display(), "opening ledger");
    let mut db = db::Database::open(&db_path)?;

    match args.len() {
        0 | 1 => run::print_month_summary(&db, models::MonthLabel::current()),
        _ => run::as_cli(&args, &mut db),
    }
}

/// `TALLY_DB` if set, otherwise `tally.db` in the platform data directory.
fn get_db_path() -> Result<std::path::PathBuf> {
    if let Some(path) = std::env::var_os("TALLY_DB").filter(|p| !p.is_empty()) {
        return Ok(path.into());
    }
    let proj_dirs = directories::ProjectDirs::from("com", "tally", "Tally")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("tally.db"))
}
