//! Tabular decoder: comma-delimited text to positional rows.
//!
//! RULE: Callers always supply the expected column list.
//! Fields are assigned by position, never by a header read from the text.
//! A first line that repeats the expected columns is skipped.
//!
//! Quoted fields are not supported. A field containing a comma shifts
//! every following column; such lines are reported with a warning.

use crate::types::{EmployeeId, Level};
use serde::{Deserialize, Serialize};

pub const EMPLOYEE_SKILL_COLUMNS: [&str; 6] =
    ["employee_id", "name", "department", "role", "skill", "skill_level"];

pub const ROLE_REQUIREMENT_COLUMNS: [&str; 3] = ["role", "required_skill", "required_level"];

// ── Public types ─────────────────────────────────────────────────────────────

/// One decoded line, fields in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Value of the named column, or "" when the column is unknown.
    pub fn get(&self, column: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub employee_id: EmployeeId,
    pub name: String,
    pub department: String,
    pub role: String,
    pub skill: String,
    pub skill_level: Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub role: String,
    pub required_skill: String,
    pub required_level: Level,
}

// ── Decoding ─────────────────────────────────────────────────────────────────

/// Decode `text` into rows keyed by `columns`.
///
/// Empty input yields an empty vec. That is a valid, empty table,
/// not a failure.
pub fn decode_rows(text: &str, columns: &[&str]) -> Vec<Row> {
    let text = text.trim();
    if text.is_empty() {
        log::debug!("decoder: empty input, no rows");
        return Vec::new();
    }

    let mut rows = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let values: Vec<&str> = line.split(',').map(str::trim).collect();

        if index == 0 && is_header_line(&values, columns) {
            log::debug!("decoder: skipping header line");
            continue;
        }
        if values.len() > columns.len() {
            log::warn!(
                "decoder: line {} has {} fields, expected {}; columns may be misaligned",
                index + 1,
                values.len(),
                columns.len()
            );
        }

        let row = Row {
            fields: columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let value = values.get(i).copied().unwrap_or("");
                    (column.to_string(), value.to_string())
                })
                .collect(),
        };
        if !row.is_blank() {
            rows.push(row);
        }
    }
    rows
}

fn is_header_line(values: &[&str], columns: &[&str]) -> bool {
    values.len() >= columns.len()
        && columns
            .iter()
            .zip(values)
            .all(|(column, value)| column.eq_ignore_ascii_case(value))
}

/// Parse a level as a decimal integer or float.
/// Anything else becomes NaN and flows on through the engine.
pub fn parse_level(raw: &str) -> Level {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|level| level.is_finite())
        .unwrap_or(f64::NAN)
}

pub fn decode_employee_skills(text: &str) -> Vec<SkillRecord> {
    decode_rows(text, &EMPLOYEE_SKILL_COLUMNS)
        .into_iter()
        .map(|row| SkillRecord {
            employee_id: row.get("employee_id").to_string(),
            name: row.get("name").to_string(),
            department: row.get("department").to_string(),
            role: row.get("role").to_string(),
            skill: row.get("skill").to_string(),
            skill_level: parse_level(row.get("skill_level")),
        })
        .collect()
}

pub fn decode_role_requirements(text: &str) -> Vec<RoleRequirement> {
    decode_rows(text, &ROLE_REQUIREMENT_COLUMNS)
        .into_iter()
        .map(|row| RoleRequirement {
            role: row.get("role").to_string(),
            required_skill: row.get("required_skill").to_string(),
            required_level: parse_level(row.get("required_level")),
        })
        .collect()
}
