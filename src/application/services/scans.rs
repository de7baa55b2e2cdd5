use std::sync::Arc;

use tracing::info;

use crate::domain::errors::{RepositoryError, ScanError};
use crate::domain::ids::UserId;
use crate::domain::profiles::Profile;
use crate::domain::repositories::ScanRepository;
use crate::domain::scans::{Analysis, MAX_SUMMARY_CHARS, NewScan, Recommendation, ScanRecord};
use crate::infrastructure::ai::{self, ExtractedAnalysis, ExtractedRecommendation};

/// Orchestrates one cover analysis run: prompt, inference, validation, insert.
/// Each invocation is parameterized purely by the caller's profile; there is
/// no shared mutable state between invocations.
#[derive(Clone)]
pub struct ScanService {
    scans: Arc<dyn ScanRepository>,
    http_client: reqwest::Client,
    gemini_url: String,
    gemini_api_key: String,
}

impl ScanService {
    pub fn new(
        scans: Arc<dyn ScanRepository>,
        http_client: reqwest::Client,
        gemini_url: String,
        gemini_api_key: String,
    ) -> Self {
        Self {
            scans,
            http_client,
            gemini_url,
            gemini_api_key,
        }
    }

    /// Run the full pipeline for one captured image. The store insert happens
    /// only after validation succeeds, so an abandoned caller can discard the
    /// result without risking a partially written record.
    #[tracing::instrument(skip_all, fields(user_id = %profile.id))]
    pub async fn analyze_and_store(
        &self,
        profile: &Profile,
        image_base64: &str,
    ) -> Result<ScanRecord, ScanError> {
        let prompt = ai::analysis_prompt(profile.preferred_genre(), profile.grade_level());

        let extracted = ai::analyze_cover(
            &self.http_client,
            &self.gemini_url,
            &self.gemini_api_key,
            image_base64,
            &prompt,
        )
        .await?;

        let analysis = validate(extracted)?;

        let record = self
            .scans
            .insert(NewScan {
                user_id: profile.id,
                analysis,
                image_url: None,
            })
            .await?;

        info!(scan_id = %record.id, title = %record.title, "cover analysis stored");
        Ok(record)
    }

    /// The "personalized for you" view: recommendations from the most recent
    /// scan. An empty list when the user has never scanned is a normal state,
    /// not an error.
    pub async fn latest_recommendations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Recommendation>, RepositoryError> {
        let latest = self.scans.latest_for_user(user_id).await?;
        Ok(latest.map(|scan| scan.recommendations).unwrap_or_default())
    }
}

/// The single chokepoint turning the model's loose output into a well-typed
/// [`Analysis`]. Downstream components never see untyped data.
pub fn validate(extracted: ExtractedAnalysis) -> Result<Analysis, ScanError> {
    let title = required(extracted.title, "title")?;
    let author = required(extracted.author, "author")?;

    let recommendations = extracted
        .future_recommendations
        .unwrap_or_default()
        .into_iter()
        .filter_map(valid_recommendation)
        .collect();

    Ok(Analysis {
        title,
        author,
        genre: extracted.genre.unwrap_or_default(),
        reading_level: extracted.reading_level.unwrap_or_default(),
        maturity_level: extracted.maturity_level.unwrap_or_default(),
        is_movie: extracted.is_movie.as_ref().is_some_and(coerce_bool),
        recommendations,
        summary: truncate_chars(
            extracted.analysis_summary.unwrap_or_default(),
            MAX_SUMMARY_CHARS,
        ),
    })
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ScanError> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ScanError::MissingField(field))
}

/// A recommendation missing its title or author is dropped on its own; one
/// bad entry must not void an otherwise good analysis. Order is preserved.
fn valid_recommendation(rec: ExtractedRecommendation) -> Option<Recommendation> {
    let title = rec.title.filter(|s| !s.trim().is_empty())?;
    let author = rec.author.filter(|s| !s.trim().is_empty())?;
    Some(Recommendation {
        title,
        author,
        reason: rec.reason.unwrap_or_default(),
    })
}

/// Truthy mapping for the movie flag: `true`/`"true"`/`"yes"`/`"1"`/`1` are
/// true, everything else is false. Never fails on a type mismatch.
fn coerce_bool(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| (f - 1.0).abs() < f64::EPSILON),
        serde_json::Value::String(s) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1")
        }
        _ => false,
    }
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let mut truncated = text;
            truncated.truncate(idx);
            truncated
        }
        None => text,
    }
}
