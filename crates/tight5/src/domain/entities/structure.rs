//! Structure templates - Named joke-construction blueprints
//!
//! Templates are static catalog data; see `services::structures` for the catalog itself.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Grouping of templates (core, wordplay, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StructureCategory {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A labeled slot in a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructurePart {
    pub id: String,
    pub label: String,
    pub description: String,
    pub allows_multiple: bool,
}

/// Blueprint of ordered parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructureTemplate {
    pub id: String,
    pub name: String,
    pub category: String,
    pub summary: String,
    pub example: String,
    pub parts: Vec<StructurePart>,
}

impl StructureTemplate {
    pub fn part(&self, part_id: &str) -> Option<&StructurePart> {
        self.parts.iter().find(|p| p.id == part_id)
    }

    /// Position of a part in template order
    pub fn part_index(&self, part_id: &str) -> Option<usize> {
        self.parts.iter().position(|p| p.id == part_id)
    }
}

/// What the writer picked for one part
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPartOption {
    pub part_id: String,
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_inputs: Option<Vec<String>>,
}
