//! # Projects
//!
//! A project is a server-assigned `id` plus whatever object the client sent.
//!
//! Known fields (`title`, `category`, `achievements`, `tools`)
//! live in the same open map as client extras so that values of an unexpected
//! type are stored untouched instead of being rejected. The typed accessors
//! simply treat such values as absent.
//!
//! Server-managed fields:
//! - `id`: `max(existing) + 1`, never taken from the client
//! - `created_at`: written once on create
//! - `updated_at`: refreshed on every update
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

pub const ID: &str = "id";
pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: u64,

    #[serde(flatten)]
    pub fields: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Project {
    pub fn create(id: u64, mut fields: Map<String, Value>, timestamp: String) -> Self {
        strip_managed(&mut fields);

        Self {
            id,
            fields,
            created_at: Some(timestamp.clone()),
            updated_at: Some(timestamp),
        }
    }

    /// Shallow merge: top-level keys in `fields` replace existing ones, the rest stay.
    pub fn merge(&mut self, mut fields: Map<String, Value>, timestamp: String) {
        strip_managed(&mut fields);

        for (key, value) in fields {
            self.fields.insert(key, value);
        }

        self.updated_at = Some(timestamp);
    }

    /// Path segments are matched against the id's decimal form, so `/api/projects/07` misses id 7.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id.to_string() == id
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn category(&self) -> Option<&str> {
        self.str_field("category")
    }

    pub fn tools(&self) -> Vec<&str> {
        self.str_list("tools")
    }

    /// Length of the `achievements` array whatever its entries are; 0 when absent or not an array.
    pub fn achievement_count(&self) -> usize {
        self.fields
            .get("achievements")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    fn str_list(&self, key: &str) -> Vec<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

pub fn next_id(projects: &[Project]) -> Result<u64, AppError> {
    match projects.iter().map(|project| project.id).max() {
        None => Ok(1),
        Some(id) => id.checked_add(1).ok_or(AppError::IdSpaceExhausted),
    }
}

fn strip_managed(fields: &mut Map<String, Value>) {
    for key in [ID, CREATED_AT, UPDATED_AT] {
        fields.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn bare(id: u64) -> Project {
        Project::create(id, Map::new(), "t0".to_string())
    }

    #[test]
    fn test_next_id_uses_max() {
        assert_eq!(next_id(&[bare(1), bare(3)]).unwrap(), 4);
        assert_eq!(next_id(&[]).unwrap(), 1);
    }

    #[test]
    fn test_next_id_at_max_is_error() {
        let err = next_id(&[bare(2), bare(u64::MAX)]).unwrap_err();
        assert!(matches!(err, AppError::IdSpaceExhausted));
    }

    #[test]
    fn test_create_ignores_client_managed_fields() {
        let project = Project::create(
            5,
            object(json!({"id": 99, "created_at": "yesterday", "title": "Dash"})),
            "t1".to_string(),
        );

        assert_eq!(project.id, 5);
        assert_eq!(project.created_at.as_deref(), Some("t1"));
        assert_eq!(project.updated_at.as_deref(), Some("t1"));
        assert_eq!(project.title(), Some("Dash"));
        assert!(!project.fields.contains_key(ID));
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut project = Project::create(
            1,
            object(json!({"title": "Old", "category": "BI", "tools": ["Excel"]})),
            "t1".to_string(),
        );

        project.merge(
            object(json!({"title": "X", "id": 42, "created_at": "never"})),
            "t2".to_string(),
        );

        assert_eq!(project.id, 1);
        assert_eq!(project.title(), Some("X"));
        assert_eq!(project.category(), Some("BI"));
        assert_eq!(project.tools(), vec!["Excel"]);
        assert_eq!(project.created_at.as_deref(), Some("t1"));
        assert_eq!(project.updated_at.as_deref(), Some("t2"));
    }

    #[test]
    fn test_matches_id_by_string() {
        let project = bare(7);
        assert!(project.matches_id("7"));
        assert!(!project.matches_id("07"));
        assert!(!project.matches_id("seven"));
    }

    #[test]
    fn test_round_trip_keeps_extras() {
        let raw = json!({
            "title": "Dash",
            "emoji": "☕",
            "id": 3,
            "created_at": "a",
            "updated_at": "b",
            "nested": {"k": [1, 2]}
        });

        let project: Project = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(project.id, 3);
        assert_eq!(project.fields["emoji"], "☕");
        assert_eq!(serde_json::to_value(&project).unwrap(), raw);
    }

    #[test]
    fn test_accessors_ignore_wrong_types() {
        let project = Project::create(
            1,
            object(json!({
                "category": 5,
                "tools": ["a", 2, "b"],
                "achievements": "many"
            })),
            "t".to_string(),
        );

        assert_eq!(project.category(), None);
        assert_eq!(project.tools(), vec!["a", "b"]);
        assert_eq!(project.achievement_count(), 0);
    }

    #[test]
    fn test_achievement_count_includes_any_entry() {
        let project = Project::create(
            1,
            object(json!({"achievements": ["a", 2, null, {"k": 1}]})),
            "t".to_string(),
        );

        assert_eq!(project.achievement_count(), 4);
        assert_eq!(bare(2).achievement_count(), 0);
    }
}
