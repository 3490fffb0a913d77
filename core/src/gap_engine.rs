//! Gap engine: joins employee skills against role requirements.
//!
//! RULES:
//!   - Each distinct employee_id is evaluated exactly once, in first-seen order.
//!   - An employee yields one GapRecord per requirement of their role,
//!     no matter how many skills they hold.
//!   - Only employees present in the skills table are considered.
//!   - Duplicate skill rows for one employee resolve to the first match.
//!     No conflict detection is performed.

use crate::{
    decoder::{RoleRequirement, SkillRecord},
    types::{EmployeeId, Level},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GapType {
    Missing,
    Deficient,
    Compliant,
    Exceeds,
}

impl GapType {
    /// Classify a computed gap (required minus current).
    /// A NaN gap fails both comparisons and lands on Exceeds.
    pub fn classify(gap: Level) -> Self {
        if gap > 0.0 {
            GapType::Deficient
        } else if gap == 0.0 {
            GapType::Compliant
        } else {
            GapType::Exceeds
        }
    }

    /// Deficient and missing both count as a gap.
    pub fn is_gap(self) -> bool {
        matches!(self, GapType::Deficient | GapType::Missing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GapType::Missing   => "missing",
            GapType::Deficient => "deficient",
            GapType::Compliant => "compliant",
            GapType::Exceeds   => "exceeds",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRecord {
    pub employee_id:    EmployeeId,
    pub employee_name:  String,
    pub department:     String,
    pub role:           String,
    pub skill:          String,
    pub current_level:  Option<Level>,
    pub required_level: Level,
    /// For a missing skill this equals required_level.
    pub gap:            Level,
    pub gap_type:       GapType,
}

impl GapRecord {
    /// Missing skills, or deficient ones at least `threshold` levels short.
    pub fn is_major(&self, threshold: Level) -> bool {
        match self.gap_type {
            GapType::Missing   => true,
            GapType::Deficient => self.gap >= threshold,
            _                  => false,
        }
    }
}

/// Compute one GapRecord per (employee, requirement of their role).
pub fn compute_gaps(skills: &[SkillRecord], requirements: &[RoleRequirement]) -> Vec<GapRecord> {
    let mut requirements_by_role: IndexMap<&str, Vec<&RoleRequirement>> = IndexMap::new();
    for req in requirements {
        requirements_by_role.entry(req.role.as_str()).or_default().push(req);
    }

    let mut skills_by_employee: IndexMap<&str, Vec<&SkillRecord>> = IndexMap::new();
    for record in skills {
        skills_by_employee
            .entry(record.employee_id.as_str())
            .or_default()
            .push(record);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut gaps = Vec::new();

    for record in skills {
        if !seen.insert(record.employee_id.as_str()) {
            continue;
        }
        let held = skills_by_employee
            .get(record.employee_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let Some(expected) = requirements_by_role.get(record.role.as_str()) else {
            continue;
        };

        for req in expected {
            let actual = held.iter().find(|s| s.skill == req.required_skill);
            gaps.push(evaluate(record, req, actual.map(|s| s.skill_level)));
        }
    }

    log::debug!(
        "gap engine: {} employees, {} roles, {} gap records",
        seen.len(),
        requirements_by_role.len(),
        gaps.len()
    );
    gaps
}

fn evaluate(employee: &SkillRecord, req: &RoleRequirement, current: Option<Level>) -> GapRecord {
    let (gap, gap_type) = match current {
        None        => (req.required_level, GapType::Missing),
        Some(level) => {
            let gap = req.required_level - level;
            (gap, GapType::classify(gap))
        }
    };
    GapRecord {
        employee_id:    employee.employee_id.clone(),
        employee_name:  employee.name.clone(),
        department:     employee.department.clone(),
        role:           employee.role.clone(),
        skill:          req.required_skill.clone(),
        current_level:  current,
        required_level: req.required_level,
        gap,
        gap_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_follows_gap_sign() {
        assert_eq!(GapType::classify(2.0), GapType::Deficient);
        assert_eq!(GapType::classify(0.0), GapType::Compliant);
        assert_eq!(GapType::classify(-1.0), GapType::Exceeds);
        assert_eq!(GapType::classify(f64::NAN), GapType::Exceeds);
    }

    #[test]
    fn gap_type_serializes_lowercase() {
        let json = serde_json::to_string(&GapType::Deficient).unwrap();
        assert_eq!(json, "\"deficient\"");
    }
}
