//! Structure catalog DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use tight5::domain::entities::{SelectedPartOption, StructureCategory};
use tight5::StructureTemplate;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StructureQuery {
    /// Only templates in this category
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StructureCatalogResponse {
    pub categories: Vec<StructureCategory>,
    pub structures: Vec<StructureTemplate>,
}

/// Turn part selections into a new joke
#[derive(Debug, Deserialize, ToSchema)]
pub struct BuildJokeRequest {
    pub title: String,
    pub selections: Vec<SelectedPartOption>,
    pub notes: Option<String>,
}
