use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ScanError;

pub const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Render the analysis instructions for the model. Deterministic: enumerates
/// every field the parser recognizes and embeds the caller's grade and genre
/// verbatim so the model can personalize the summary.
pub fn analysis_prompt(preferred_genre: &str, grade_level: &str) -> String {
    format!(
        r#"Analyze this book cover image. Provide the following details in JSON format:
- title: The title of the book.
- author: The author of the book.
- genre: The main genre.
- reading_level: Suggested reading level in AR (Accelerated Reader) format if applicable PLUS ALWAYS the grade level (e.g. "4.5 (4th Grade)").
- maturity_level: Maturity rating (e.g. G, PG, PG-13, R) and brief reason.
- is_movie: Boolean, true if it has been adapted into a movie.
- future_recommendations: A list of 3 similar books with "title", "author", and "reason" for each.
- analysis_summary: A 2-sentence summary.
  First sentence: Evaluate if this book is appropriate for a student in grade {grade_level}.
  Second sentence: Mention how well it fits their favorite genre ({preferred_genre})."#
    )
}

// --- Public types ---

/// The model's answer as parsed, before validation. Every field is loose:
/// the model may omit any of them or return the wrong primitive type for the
/// movie flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedAnalysis {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub reading_level: Option<String>,
    pub maturity_level: Option<String>,
    pub is_movie: Option<serde_json::Value>,
    pub future_recommendations: Option<Vec<ExtractedRecommendation>>,
    pub analysis_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedRecommendation {
    pub title: Option<String>,
    pub author: Option<String>,
    pub reason: Option<String>,
}

// --- Public functions ---

/// Send one cover image plus prompt to the inference provider and parse the
/// answer. Exactly one round trip: any failure is reported, never retried.
pub async fn analyze_cover(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    image_base64: &str,
    prompt: &str,
) -> Result<ExtractedAnalysis, ScanError> {
    let request_body = GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: prompt.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: IMAGE_MIME_TYPE.to_string(),
                        data: image_base64.to_string(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
        },
    };

    let response = client
        .post(url)
        .query(&[("key", api_key)])
        .timeout(REQUEST_TIMEOUT)
        .json(&request_body)
        .send()
        .await
        .map_err(|e| ScanError::Transport(format!("request to analysis provider failed: {e}")))?;

    let body = response.text().await.map_err(|e| {
        ScanError::Transport(format!("failed to read analysis provider response: {e}"))
    })?;

    let text = extract_candidate_text(&body)?;
    parse_analysis(&text)
}

/// Pull the answer text out of the provider's response envelope.
/// An explicit error payload takes precedence over any candidate content;
/// missing or invalid credentials surface here as a provider error too.
fn extract_candidate_text(body: &str) -> Result<String, ScanError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        ScanError::Transport(format!("failed to parse analysis provider response: {e}"))
    })?;

    if let Some(error) = envelope.error {
        return Err(ScanError::Provider(error.message));
    }

    let text = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ScanError::EmptyResult);
    }

    Ok(text)
}

/// Parse the model's answer text into a structured analysis.
///
/// Two attempts only: a direct parse of the full text, then a parse of the
/// substring bounded by the outermost matching brace pair (recovers answers
/// wrapped in prose or markdown fencing). Callers never do their own text
/// surgery.
pub fn parse_analysis(raw: &str) -> Result<ExtractedAnalysis, ScanError> {
    if let Ok(parsed) = serde_json::from_str(raw) {
        return Ok(parsed);
    }

    let recovered = braced_substring(raw).ok_or(ScanError::MalformedResponse)?;
    serde_json::from_str(recovered).map_err(|_| ScanError::MalformedResponse)
}

/// The substring from the first `{` to the last `}`, if both exist in order.
fn braced_substring(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

// --- Gemini API types ---

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ErrorPayload>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: String,
}
