//! # Store
//!
//! Flat JSON file holding every project.
//!
//! ## Requirements
//!
//! - Single document: a JSON array of project objects
//! - Missing or blank file reads as an empty collection
//! - Every mutation rewrites the whole file, pretty-printed
//!
//! ## Implementation
//!
//! - No caching, each request reloads from disk
//! - Callers serialize load/mutate/save through the lock in [`crate::state::AppState`]
//! - [`MemoryStore`] stands in for the file in tests
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use serde_json::json;
use tracing::info;

use crate::{error::AppError, project::Project, utils::now_timestamp};

pub trait ProjectStore: Send + Sync {
    fn load(&self) -> Result<Vec<Project>, AppError>;

    fn save(&self, projects: &[Project]) -> Result<(), AppError>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the sample collection when the data file does not exist yet.
    pub fn seed_if_missing(&self) -> Result<bool, AppError> {
        if self.path.exists() {
            return Ok(false);
        }

        self.save(&[sample_project()])?;
        info!("Created {} with sample project", self.path.display());

        Ok(true)
    }
}

impl ProjectStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Project>, AppError> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim_ascii().is_empty() {
            return Ok(Vec::new());
        }

        // Invalid UTF-8 surfaces here as a parse error, not an I/O one.
        serde_json::from_slice(&contents).map_err(AppError::StorageCorruption)
    }

    fn save(&self, projects: &[Project]) -> Result<(), AppError> {
        write_pretty(&self.path, projects)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    projects: Mutex<Vec<Project>>,
}

impl MemoryStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: Mutex::new(projects),
        }
    }
}

impl ProjectStore for MemoryStore {
    fn load(&self) -> Result<Vec<Project>, AppError> {
        Ok(self
            .projects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, projects: &[Project]) -> Result<(), AppError> {
        *self.projects.lock().unwrap_or_else(PoisonError::into_inner) = projects.to_vec();

        Ok(())
    }
}

pub fn write_pretty(path: &Path, projects: &[Project]) -> Result<(), AppError> {
    let mut contents = serde_json::to_string_pretty(projects).map_err(io::Error::from)?;
    contents.push('\n');

    fs::write(path, contents)?;

    Ok(())
}

pub fn sample_project() -> Project {
    let fields = [
        ("title", json!("Coffee Shop Sales Analytics Dashboard")),
        ("category", json!("Data Analysis & Business Intelligence")),
        (
            "description",
            json!(
                "Comprehensive analysis of 65,000+ transactions to uncover actionable business insights for coffee shop optimization."
            ),
        ),
        (
            "achievements",
            json!([
                "Identified $50,000+ revenue opportunity through evening hour analysis",
                "Discovered 45% revenue concentration in 3-hour morning window",
                "Mapped product portfolio showing 65% sales from Coffee+Tea categories"
            ]),
        ),
        (
            "tools",
            json!(["Tableau", "Excel", "Statistical Analysis", "Business Intelligence"]),
        ),
        ("projectLink", json!("#")),
        ("githubLink", json!("#")),
        ("emoji", json!("☕")),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect();

    Project::create(1, fields, now_timestamp())
}
