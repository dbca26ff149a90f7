mod db;
mod error;
mod models;
mod ops;
mod run;

use anyhow::Result;

use crate::error::TasError;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let db = db::Database::open(&db_path)?;
    run::as_cli(&args, &db)
}

fn get_db_path() -> Result<std::path::PathBuf> {
    if let Ok(path) = std::env::var("TAS_DB") {
        return Ok(std::path::PathBuf::from(path));
    }
    let proj_dirs = directories::ProjectDirs::from("", "", "tas")
        .ok_or_else(|| TasError::StorageUnavailable("could not determine data directory".into()))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| TasError::StorageUnavailable(format!("{}: {e}", data_dir.display())))?;
    Ok(data_dir.join("tas.db"))
}
