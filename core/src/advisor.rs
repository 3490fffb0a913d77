//! Narrative advisor: summarized prompt out, structured insights back.
//!
//! RULE: The advisor is an injected capability. The gap engine and
//! aggregators never depend on it, and an advisor failure never touches
//! the locally computed aggregates.
//!
//! Transports live in submodules:
//!   - gemini: HTTP call to the Gemini generateContent endpoint
//!   - stub:   canned responses for tests and dry runs

pub mod gemini;
pub mod stub;

use crate::{
    config::AdvisorSettings,
    decoder::{RoleRequirement, SkillRecord},
    error::{AnalysisError, AnalysisResult},
    gap_engine::GapRecord,
};
use indexmap::IndexSet;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use gemini::GeminiAdvisor;
pub use stub::StaticAdvisor;

/// Raw advisor output is truncated to this many chars in error messages.
const RAW_ERROR_EXCERPT: usize = 1000;

/// The contract every advisor transport must fulfill.
pub trait NarrativeAdvisor: Send + Sync {
    /// Stable name for logging.
    fn name(&self) -> &'static str;

    /// One request, one response. No retries.
    fn summarize(&self, request: &AdvisorRequest) -> AnalysisResult<AdvisorInsights>;
}

/// Stands in when no API key is configured. Always succeeds.
pub struct DisabledAdvisor;

impl NarrativeAdvisor for DisabledAdvisor {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn summarize(&self, _request: &AdvisorRequest) -> AnalysisResult<AdvisorInsights> {
        Ok(AdvisorInsights {
            overall_summary: Some(
                "AI analysis is disabled as the API key is not configured.".into(),
            ),
            training_recommendations: Some(Vec::new()),
            hiring_suggestions: Some(Vec::new()),
            upskilling_priorities: Some(Vec::new()),
            role_readiness_summaries: Some(Vec::new()),
        })
    }
}

/// Pick the advisor for these settings: Gemini when a key is present,
/// otherwise the disabled stand-in.
pub fn advisor_from_settings(settings: &AdvisorSettings) -> AnalysisResult<Box<dyn NarrativeAdvisor>> {
    Ok(match GeminiAdvisor::from_settings(settings)? {
        Some(gemini) => Box::new(gemini),
        None => Box::new(DisabledAdvisor),
    })
}

// ── Insights ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingRecommendation {
    #[serde(deserialize_with = "null_as_default")]
    pub employee_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HiringSuggestion {
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hiring_suggestion: String,
    #[serde(deserialize_with = "null_as_default")]
    pub profile_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpskillingPriority {
    #[serde(deserialize_with = "null_as_default")]
    pub skill: String,
    #[serde(deserialize_with = "null_as_default")]
    pub justification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleReadinessSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub readiness_summary: String,
}

/// An explicit null reads as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Every key is optional. An empty value is a valid "no recommendations"
/// answer and is distinct from an advisor failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorInsights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_recommendations: Option<Vec<TrainingRecommendation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hiring_suggestions: Option<Vec<HiringSuggestion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upskilling_priorities: Option<Vec<UpskillingPriority>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_readiness_summaries: Option<Vec<RoleReadinessSummary>>,
}

impl AdvisorInsights {
    pub fn summary_only(summary: impl Into<String>) -> Self {
        Self {
            overall_summary: Some(summary.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overall_summary.is_none()
            && self.training_recommendations.as_ref().is_none_or(Vec::is_empty)
            && self.hiring_suggestions.as_ref().is_none_or(Vec::is_empty)
            && self.upskilling_priorities.as_ref().is_none_or(Vec::is_empty)
            && self.role_readiness_summaries.as_ref().is_none_or(Vec::is_empty)
    }

    pub fn training(&self) -> &[TrainingRecommendation] {
        self.training_recommendations.as_deref().unwrap_or_default()
    }

    pub fn hiring(&self) -> &[HiringSuggestion] {
        self.hiring_suggestions.as_deref().unwrap_or_default()
    }

    pub fn upskilling(&self) -> &[UpskillingPriority] {
        self.upskilling_priorities.as_deref().unwrap_or_default()
    }

    pub fn readiness(&self) -> &[RoleReadinessSummary] {
        self.role_readiness_summaries.as_deref().unwrap_or_default()
    }
}

// ── Request ──────────────────────────────────────────────────────────────────

/// Summarized view of one analysis run, sized to keep the prompt small.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisorRequest {
    pub employee_row_count: usize,
    pub requirement_row_count: usize,
    pub gap_count: usize,
    pub roles_with_gaps: Vec<String>,
    pub skills_with_gaps: Vec<String>,
    pub sample_skills: Vec<SkillRecord>,
    pub sample_requirements: Vec<RoleRequirement>,
    pub sample_gaps: Vec<GapRecord>,
}

impl AdvisorRequest {
    pub fn from_inputs(
        skills: &[SkillRecord],
        requirements: &[RoleRequirement],
        gaps: &[GapRecord],
        settings: &AdvisorSettings,
    ) -> Self {
        let with_gap: Vec<&GapRecord> = gaps.iter().filter(|g| g.gap_type.is_gap()).collect();

        let roles: IndexSet<&str> = with_gap.iter().map(|g| g.role.as_str()).collect();
        let skill_names: IndexSet<&str> = with_gap.iter().map(|g| g.skill.as_str()).collect();

        Self {
            employee_row_count: skills.len(),
            requirement_row_count: requirements.len(),
            gap_count: gaps.len(),
            roles_with_gaps: roles
                .into_iter()
                .take(settings.sample_names)
                .map(String::from)
                .collect(),
            skills_with_gaps: skill_names
                .into_iter()
                .take(settings.sample_names)
                .map(String::from)
                .collect(),
            sample_skills: skills.iter().take(settings.sample_rows).cloned().collect(),
            sample_requirements: requirements.iter().take(settings.sample_rows).cloned().collect(),
            sample_gaps: with_gap
                .into_iter()
                .take(settings.sample_rows)
                .cloned()
                .collect(),
        }
    }

    /// Render the instruction text sent to the model.
    pub fn prompt(&self) -> AnalysisResult<String> {
        let roles = join_or_na(&self.roles_with_gaps);
        let skills = join_or_na(&self.skills_with_gaps);
        let sample_skills = serde_json::to_string(&self.sample_skills)?;
        let sample_requirements = serde_json::to_string(&self.sample_requirements)?;
        let sample_gaps = serde_json::to_string(&self.sample_gaps)?;

        Ok(format!(
            r#"You are an assistant specialised in workforce skills gap analysis.
Use the employee skills, role requirements and computed gaps below to produce actionable insights.

Context:
- Employee skill rows: {employees}
- Role requirement rows: {requirements}
- Computed gap records: {gaps}
  - Roles with notable gaps: {roles}
  - Skills with notable gaps: {skills}

Employee skills sample:
{sample_skills}

Role requirements sample:
{sample_requirements}

Gaps sample (deficient or missing):
{sample_gaps}

Reply with a single JSON object containing exactly these keys:
1. "overallSummary": string, 2-3 sentences on the overall skill landscape and its main concerns.
2. "trainingRecommendations": array of {{"employee_id", "name", "role", "suggestions": [string]}} for up to 5 employees or roles with significant gaps.
3. "hiringSuggestions": array of {{"role", "hiring_suggestion", "profile_keywords": [string]}} for up to 3 roles whose gaps are hard to close internally.
4. "upskillingPriorities": array of {{"skill", "justification"}} for the top 2-3 company-wide upskilling priorities.
5. "roleReadinessSummaries": array of {{"role", "readiness_summary"}} with one sentence for up to 5 key roles.

If the data is insufficient for a category, return an empty array for it."#,
            employees = self.employee_row_count,
            requirements = self.requirement_row_count,
            gaps = self.gap_count,
        ))
    }
}

fn join_or_na(names: &[String]) -> String {
    if names.is_empty() {
        "N/A".into()
    } else {
        names.join(", ")
    }
}

// ── Response parsing ─────────────────────────────────────────────────────────

/// Parse raw model output into insights.
///
/// The text may be wrapped in a ```json fence. Keys with the wrong shape
/// are dropped, as are malformed entries inside a list. Empty output, or
/// output that is not a JSON object, is an error.
pub fn parse_advisor_response(text: &str) -> AnalysisResult<AdvisorInsights> {
    let cleaned = strip_code_fence(text.trim());
    if cleaned.is_empty() {
        return Err(AnalysisError::AdvisorEmptyResponse);
    }

    let parsed: Value = serde_json::from_str(cleaned).map_err(|e| {
        log::warn!("advisor: response is not valid JSON: {e}");
        AnalysisError::AdvisorInvalidJson {
            raw: text.chars().take(RAW_ERROR_EXCERPT).collect(),
        }
    })?;

    if !parsed.is_object() {
        log::warn!("advisor: response is JSON but not an object");
        return Err(AnalysisError::AdvisorInvalidJson {
            raw: text.chars().take(RAW_ERROR_EXCERPT).collect(),
        });
    }

    Ok(AdvisorInsights {
        overall_summary: parsed
            .get("overallSummary")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from),
        training_recommendations: list_field(&parsed, "trainingRecommendations"),
        hiring_suggestions: list_field(&parsed, "hiringSuggestions"),
        upskilling_priorities: list_field(&parsed, "upskillingPriorities"),
        role_readiness_summaries: list_field(&parsed, "roleReadinessSummaries"),
    })
}

fn list_field<T: DeserializeOwned>(parsed: &Value, key: &str) -> Option<Vec<T>> {
    let items = parsed.get(key)?.as_array()?;
    let list = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("advisor: dropping malformed '{key}' entry {index}: {e}");
                None
            }
        })
        .collect();
    Some(list)
}

/// Remove a surrounding ``` or ```lang fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```").and_then(|t| t.strip_suffix("```")) else {
        return text;
    };
    // Drop an optional language tag on the opening line.
    let inner = inner.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("{}"), "{}");
    }

    #[test]
    fn unterminated_fence_is_left_alone() {
        assert_eq!(strip_code_fence("```json\n{}"), "```json\n{}");
    }
}
