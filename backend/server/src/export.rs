use std::path::Path;

use chrono::{DateTime, Local};
use tracing::info;

use crate::{error::AppError, project::Project, store::write_pretty};

pub fn export_filename(now: DateTime<Local>) -> String {
    format!("portfolio_export_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Snapshots `projects` into `dir`, returning the bare file name. Same-second exports overwrite.
pub fn export_projects(
    projects: &[Project],
    dir: &Path,
    now: DateTime<Local>,
) -> Result<String, AppError> {
    let filename = export_filename(now);
    write_pretty(&dir.join(&filename), projects)?;

    info!("Exported {} projects to {filename}", projects.len());

    Ok(filename)
}
