use indexmap::IndexMap;
use serde::Serialize;

use crate::project::Project;

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Serialize, Debug, PartialEq)]
pub struct Statistics {
    pub total_projects: usize,
    pub categories: IndexMap<String, usize>,
    pub tools: IndexMap<String, usize>,
    pub total_achievements: usize,
}

pub fn compute(projects: &[Project]) -> Statistics {
    let mut categories = IndexMap::new();
    let mut tools = IndexMap::new();

    for project in projects {
        let category = project.category().unwrap_or(UNCATEGORIZED);
        *categories.entry(category.to_string()).or_insert(0) += 1;

        for tool in project.tools() {
            *tools.entry(tool.to_string()).or_insert(0) += 1;
        }
    }

    Statistics {
        total_projects: projects.len(),
        categories,
        tools,
        total_achievements: projects.iter().map(Project::achievement_count).sum(),
    }
}
