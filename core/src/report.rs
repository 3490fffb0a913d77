//! Report export: any serializable record list to quoted CSV text.
//!
//! Format:
//!   - header row: field names joined by ",", unquoted
//!   - data rows: every value double-quoted, inner quotes doubled
//!   - arrays joined with "; ", objects embedded as JSON, null as ""
//!   - rows separated by CRLF, no trailing line break

use crate::{
    analysis::AnalysisOutcome,
    config::ReportSettings,
    error::AnalysisResult,
    gap_engine::GapRecord,
    types::Level,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Serialize `records` to delimited text.
///
/// Header fields come from `fields` when given, otherwise from the keys of
/// the first record in declaration order. Empty input gives "".
pub fn to_delimited<T: Serialize>(records: &[T], fields: Option<&[&str]>) -> AnalysisResult<String> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let rows: Vec<Map<String, Value>> = records
        .iter()
        .map(|r| {
            serde_json::to_value(r).map(|v| match v {
                Value::Object(map) => map,
                other => Map::from_iter([("value".to_string(), other)]),
            })
        })
        .collect::<Result<_, _>>()?;

    let headers: Vec<String> = match fields {
        Some(fields) => fields.iter().map(|f| f.to_string()).collect(),
        None => rows[0].keys().cloned().collect(),
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in &rows {
        let line: Vec<String> = headers
            .iter()
            .map(|h| quote(&cell_text(row.get(h).unwrap_or(&Value::Null))))
            .collect();
        lines.push(line.join(","));
    }
    Ok(lines.join("\r\n"))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(format_level).unwrap_or_default()
            }
        }
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join("; "),
        Value::Object(_) => value.to_string(),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Levels print without a trailing ".0" when integral. NaN prints as an
/// empty cell, the same as a serialized NaN (which becomes null).
pub fn format_level(level: Level) -> String {
    if level.is_nan() {
        String::new()
    } else {
        format!("{level}")
    }
}

// ── Report catalogue ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    MajorGaps,
    TrainingRecommendations,
    RoleReadiness,
    HiringNeeds,
    AllGaps,
    EmployeeSkills,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::MajorGaps,
        ReportKind::TrainingRecommendations,
        ReportKind::RoleReadiness,
        ReportKind::HiringNeeds,
        ReportKind::AllGaps,
        ReportKind::EmployeeSkills,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::MajorGaps               => "Employees with Major Skill Gaps",
            ReportKind::TrainingRecommendations => "Training Recommendations (AI)",
            ReportKind::RoleReadiness           => "Role Readiness Summary (AI)",
            ReportKind::HiringNeeds             => "Hiring Needs (AI)",
            ReportKind::AllGaps                 => "All Calculated Skill Gaps",
            ReportKind::EmployeeSkills          => "Original Employee Skills Data",
        }
    }

    /// Lowercased title, whitespace runs replaced by "_", plus "_report.csv".
    pub fn file_name(self) -> String {
        let stem = self
            .title()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        format!("{stem}_report.csv")
    }
}

#[derive(Serialize)]
struct MajorGapRow<'a> {
    #[serde(rename = "Employee_ID")]
    employee_id: &'a str,
    #[serde(rename = "Employee_Name")]
    employee_name: &'a str,
    #[serde(rename = "Department")]
    department: &'a str,
    #[serde(rename = "Role")]
    role: &'a str,
    #[serde(rename = "Skill_Missing_Or_Deficient")]
    skill: &'a str,
    #[serde(rename = "Current_Level")]
    current_level: String,
    #[serde(rename = "Required_Level")]
    required_level: String,
    #[serde(rename = "Gap_Severity")]
    gap_severity: String,
    #[serde(rename = "Gap_Type")]
    gap_type: &'static str,
}

#[derive(Serialize)]
struct TrainingRow<'a> {
    #[serde(rename = "Employee_ID")]
    employee_id: &'a str,
    #[serde(rename = "Employee_Name")]
    employee_name: &'a str,
    #[serde(rename = "Role")]
    role: &'a str,
    #[serde(rename = "Training_Suggestions")]
    suggestions: &'a [String],
}

#[derive(Serialize)]
struct ReadinessRow<'a> {
    #[serde(rename = "Role")]
    role: &'a str,
    #[serde(rename = "Readiness_Summary")]
    readiness_summary: &'a str,
}

#[derive(Serialize)]
struct HiringRow<'a> {
    #[serde(rename = "Role_Needing_Hiring")]
    role: &'a str,
    #[serde(rename = "Hiring_Suggestion_Reason")]
    reason: &'a str,
    #[serde(rename = "Ideal_Candidate_Keywords")]
    keywords: &'a [String],
}

/// GapRecord as exported: an absent current level reads "N/A".
#[derive(Serialize)]
struct GapExportRow<'a> {
    employee_id: &'a str,
    employee_name: &'a str,
    department: &'a str,
    role: &'a str,
    skill: &'a str,
    current_level: String,
    required_level: String,
    gap: String,
    gap_type: &'static str,
}

impl<'a> From<&'a GapRecord> for GapExportRow<'a> {
    fn from(g: &'a GapRecord) -> Self {
        Self {
            employee_id: &g.employee_id,
            employee_name: &g.employee_name,
            department: &g.department,
            role: &g.role,
            skill: &g.skill,
            current_level: g.current_level.map(format_level).unwrap_or_else(|| "N/A".into()),
            required_level: format_level(g.required_level),
            gap: format_level(g.gap),
            gap_type: g.gap_type.as_str(),
        }
    }
}

/// Number of rows `kind` would export for this outcome.
pub fn row_count(kind: ReportKind, outcome: &AnalysisOutcome, settings: &ReportSettings) -> usize {
    let insights = outcome.insights();
    match kind {
        ReportKind::MajorGaps => outcome.major_gaps(settings.major_gap_threshold).len(),
        ReportKind::TrainingRecommendations => insights.map_or(0, |i| i.training().len()),
        ReportKind::RoleReadiness => insights.map_or(0, |i| i.readiness().len()),
        ReportKind::HiringNeeds => insights.map_or(0, |i| i.hiring().len()),
        ReportKind::AllGaps => outcome.gaps.len(),
        ReportKind::EmployeeSkills => outcome.skills.len(),
    }
}

/// Render one report. A report with no rows renders as "".
pub fn build_report(
    kind: ReportKind,
    outcome: &AnalysisOutcome,
    settings: &ReportSettings,
) -> AnalysisResult<String> {
    let insights = outcome.insights();
    match kind {
        ReportKind::MajorGaps => {
            let rows: Vec<MajorGapRow> = outcome
                .major_gaps(settings.major_gap_threshold)
                .into_iter()
                .map(|g| MajorGapRow {
                    employee_id: &g.employee_id,
                    employee_name: &g.employee_name,
                    department: &g.department,
                    role: &g.role,
                    skill: &g.skill,
                    current_level: g
                        .current_level
                        .map(format_level)
                        .unwrap_or_else(|| "N/A (Missing)".into()),
                    required_level: format_level(g.required_level),
                    gap_severity: format_level(g.gap),
                    gap_type: g.gap_type.as_str(),
                })
                .collect();
            to_delimited(&rows, None)
        }
        ReportKind::TrainingRecommendations => {
            let rows: Vec<TrainingRow> = insights
                .map(|i| i.training())
                .unwrap_or_default()
                .iter()
                .map(|t| TrainingRow {
                    employee_id: &t.employee_id,
                    employee_name: &t.name,
                    role: &t.role,
                    suggestions: &t.suggestions,
                })
                .collect();
            to_delimited(&rows, None)
        }
        ReportKind::RoleReadiness => {
            let rows: Vec<ReadinessRow> = insights
                .map(|i| i.readiness())
                .unwrap_or_default()
                .iter()
                .map(|r| ReadinessRow {
                    role: &r.role,
                    readiness_summary: &r.readiness_summary,
                })
                .collect();
            to_delimited(&rows, None)
        }
        ReportKind::HiringNeeds => {
            let rows: Vec<HiringRow> = insights
                .map(|i| i.hiring())
                .unwrap_or_default()
                .iter()
                .map(|h| HiringRow {
                    role: &h.role,
                    reason: &h.hiring_suggestion,
                    keywords: &h.profile_keywords,
                })
                .collect();
            to_delimited(&rows, None)
        }
        ReportKind::AllGaps => {
            let rows: Vec<GapExportRow> = outcome.gaps.iter().map(GapExportRow::from).collect();
            to_delimited(&rows, None)
        }
        ReportKind::EmployeeSkills => to_delimited(&outcome.skills, None),
    }
}

/// Write every non-empty report into `dir`. Returns the paths written.
pub fn write_reports(
    outcome: &AnalysisOutcome,
    dir: &Path,
    settings: &ReportSettings,
) -> AnalysisResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for kind in ReportKind::ALL {
        let text = build_report(kind, outcome, settings)?;
        if text.is_empty() {
            log::debug!("report: '{}' has no data, skipped", kind.title());
            continue;
        }
        let path = dir.join(kind.file_name());
        std::fs::write(&path, text)?;
        log::info!("report: wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
