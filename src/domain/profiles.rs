use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::UserId;

/// Fallback genre when a profile has no stated preference.
pub const DEFAULT_GENRE: &str = "Any";
/// Fallback grade level when a profile has no stated grade.
pub const DEFAULT_GRADE: &str = "All ages";

/// A reader profile. The pipeline only reads `favorite_genre` and
/// `school_grade` (as plain strings) to personalize the analysis prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub favorite_genre: Option<String>,
    pub school_grade: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// The genre used to personalize analysis prompts.
    pub fn preferred_genre(&self) -> &str {
        self.favorite_genre
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_GENRE)
    }

    /// The grade level used to personalize analysis prompts.
    pub fn grade_level(&self) -> &str {
        self.school_grade
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_GRADE)
    }
}

/// The API-facing shape of a profile: the stored fields plus the friendly
/// grade label derived from `school_grade`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub display_grade: String,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        let display_grade = crate::domain::formatting::format_grade(profile.school_grade.as_deref());
        Self {
            profile,
            display_grade,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_grade: Option<String>,
}

impl NewProfile {
    pub fn normalize(mut self) -> Self {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.favorite_genre = normalize_opt(self.favorite_genre);
        self.school_grade = normalize_opt(self.school_grade);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub favorite_genre: Option<String>,
    pub school_grade: Option<String>,
}

impl UpdateProfile {
    pub fn has_changes(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.favorite_genre.is_some()
            || self.school_grade.is_some()
    }
}

fn normalize_opt(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
