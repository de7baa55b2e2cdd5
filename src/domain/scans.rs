use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{ScanId, UserId};

/// Upper bound on the persisted summary text. The model is asked for two
/// sentences but is not contractually bound to stop there, so the validator
/// truncates on a character boundary before anything reaches the store.
pub const MAX_SUMMARY_CHARS: usize = 2000;

/// A single suggested follow-up book attached to an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub author: String,
    pub reason: String,
}

/// A fully validated cover analysis. Constructed once per successful pipeline
/// run by the validator and immutable thereafter; everything downstream of
/// the validator sees only this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub reading_level: String,
    pub maturity_level: String,
    pub is_movie: bool,
    /// Ordered as ranked by the model; never re-sorted.
    pub recommendations: Vec<Recommendation>,
    /// Appropriateness and genre-fit judgment, opaque text.
    pub summary: String,
}

/// A validated analysis plus the caller's identity, ready for insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScan {
    pub user_id: UserId,
    pub analysis: Analysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The persisted, identity-tagged, timestamped form of an [`Analysis`].
/// Append-only: a record is never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: ScanId,
    pub user_id: UserId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub reading_level: String,
    pub maturity_level: String,
    pub is_movie: bool,
    pub recommendations: Vec<Recommendation>,
    pub ai_analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
