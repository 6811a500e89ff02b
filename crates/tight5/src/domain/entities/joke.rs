//! Joke - The unit of material
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Performance;
use crate::domain::value_objects::{Energy, JokeStatus, JokeType, Technique};

/// Default delivery time for a new joke, in seconds
pub const DEFAULT_ESTIMATED_TIME: u32 = 30;

/// Joke - setup, punchline and everything learned about it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Joke {
    pub id: Uuid,
    #[serde(skip)]
    pub owner_id: String,
    pub title: String,
    pub setup: String,
    pub punchline: String,
    pub tags: Vec<String>,
    /// Estimated delivery time in seconds
    pub estimated_time: u32,
    pub energy: Energy,
    #[serde(rename = "type")]
    pub joke_type: JokeType,
    pub status: JokeStatus,
    pub notes: String,
    /// Newest first
    #[serde(default)]
    pub versions: Vec<JokeVersion>,
    /// Newest first
    #[serde(default)]
    pub performances: Vec<Performance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<JokeStructureSelection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub techniques: Vec<Technique>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable snapshot of a joke's text at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JokeVersion {
    pub id: Uuid,
    pub setup: String,
    pub punchline: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Which structure template built a joke and what was picked for each part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JokeStructureSelection {
    pub structure_id: String,
    pub structure_name: String,
    pub parts: Vec<StructurePartSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructurePartSelection {
    pub part_id: String,
    pub label: String,
    pub selected: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_inputs: Option<Vec<String>>,
}

/// Fields for creating a joke. Missing optionals take the product defaults.
#[derive(Debug, Clone, Default)]
pub struct NewJoke {
    pub title: String,
    pub setup: String,
    pub punchline: String,
    pub tags: Vec<String>,
    pub estimated_time: Option<u32>,
    pub energy: Option<Energy>,
    pub joke_type: Option<JokeType>,
    pub status: Option<JokeStatus>,
    pub notes: Option<String>,
    pub structure: Option<JokeStructureSelection>,
    pub techniques: Vec<Technique>,
}

/// Partial update of a joke. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct JokeChanges {
    pub title: Option<String>,
    pub setup: Option<String>,
    pub punchline: Option<String>,
    pub tags: Option<Vec<String>>,
    pub estimated_time: Option<u32>,
    pub energy: Option<Energy>,
    pub joke_type: Option<JokeType>,
    pub status: Option<JokeStatus>,
    pub notes: Option<String>,
    pub techniques: Option<Vec<Technique>>,
}

impl Joke {
    /// Create a new Joke with generated ID and timestamps
    pub fn new(owner_id: impl Into<String>, new: NewJoke) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            title: new.title,
            setup: new.setup,
            punchline: new.punchline,
            tags: new.tags,
            estimated_time: new.estimated_time.unwrap_or(DEFAULT_ESTIMATED_TIME),
            energy: new.energy.unwrap_or_default(),
            joke_type: new.joke_type.unwrap_or_default(),
            status: new.status.unwrap_or_default(),
            notes: new.notes.unwrap_or_default(),
            versions: Vec::new(),
            performances: Vec::new(),
            structure: new.structure,
            techniques: new.techniques,
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot of the current text as a version
    pub fn snapshot(&self) -> JokeVersion {
        JokeVersion {
            id: Uuid::new_v4(),
            setup: self.setup.clone(),
            punchline: self.punchline.clone(),
            tags: self.tags.clone(),
            notes: self.notes.clone(),
            created_at: Utc::now(),
        }
    }

    /// Apply changes in place.
    ///
    /// Returns the version recorded when setup or punchline text changed. The version holds the
    /// text as it was before the change and is already prepended to `versions`.
    pub fn apply(&mut self, changes: JokeChanges) -> Option<JokeVersion> {
        let setup_changed = changes.setup.as_ref().is_some_and(|s| *s != self.setup);
        let punchline_changed = changes
            .punchline
            .as_ref()
            .is_some_and(|p| *p != self.punchline);

        let version = (setup_changed || punchline_changed).then(|| self.snapshot());

        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(setup) = changes.setup {
            self.setup = setup;
        }
        if let Some(punchline) = changes.punchline {
            self.punchline = punchline;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if let Some(estimated_time) = changes.estimated_time {
            self.estimated_time = estimated_time;
        }
        if let Some(energy) = changes.energy {
            self.energy = energy;
        }
        if let Some(joke_type) = changes.joke_type {
            self.joke_type = joke_type;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(notes) = changes.notes {
            self.notes = notes;
        }
        if let Some(techniques) = changes.techniques {
            self.techniques = techniques;
        }

        if let Some(v) = &version {
            self.versions.insert(0, v.clone());
        }
        self.updated_at = Utc::now();

        version
    }

    /// Changes that bring back the text of a stored version
    pub fn restore_changes(&self, version_id: Uuid) -> Option<JokeChanges> {
        let version = self.versions.iter().find(|v| v.id == version_id)?;
        Some(JokeChanges {
            setup: Some(version.setup.clone()),
            punchline: Some(version.punchline.clone()),
            tags: Some(version.tags.clone()),
            ..Default::default()
        })
    }
}
