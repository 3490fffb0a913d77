//! Aggregators: reduce the gap list into chart-ready summaries.
//!
//! Every reducer is a fresh pass over the same immutable GapRecords.
//! No state is shared between them.

use crate::{
    decoder::{RoleRequirement, SkillRecord},
    gap_engine::{GapRecord, GapType},
};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAggregate {
    pub skill: String,
    pub deficient_count: usize,
    pub missing_count: usize,
    pub average_gap: f64,
}

impl SkillAggregate {
    pub fn total_gaps(&self) -> usize {
        self.deficient_count + self.missing_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComplianceSplit {
    Split { compliant: usize, non_compliant: usize },
    /// No employees in the input. Rendered as a single full bucket.
    NoData,
}

impl ComplianceSplit {
    /// Named pie-chart buckets.
    pub fn chart_buckets(&self) -> Vec<(&'static str, usize)> {
        match *self {
            ComplianceSplit::Split { compliant, non_compliant } => {
                vec![("Compliant", compliant), ("Non-Compliant", non_compliant)]
            }
            ComplianceSplit::NoData => vec![("No Data", 1)],
        }
    }

    pub fn total(&self) -> usize {
        match *self {
            ComplianceSplit::Split { compliant, non_compliant } => compliant + non_compliant,
            ComplianceSplit::NoData => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSkillGap {
    pub department: String,
    pub skill: String,
    pub gap_count: usize,
}

// ── Reducers ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SkillTally {
    deficient: usize,
    missing: usize,
    gap_sum: f64,
}

/// Per-skill deficient/missing counts over every required or observed skill.
/// Sorted by total gaps, descending; ties keep first-seen order.
pub fn aggregate_skills(gaps: &[GapRecord], requirements: &[RoleRequirement]) -> Vec<SkillAggregate> {
    let mut tallies: IndexMap<&str, SkillTally> = IndexMap::new();
    for req in requirements {
        tallies.entry(req.required_skill.as_str()).or_default();
    }
    for gap in gaps {
        tallies.entry(gap.skill.as_str()).or_default();
    }

    for gap in gaps {
        let Some(tally) = tallies.get_mut(gap.skill.as_str()) else {
            continue;
        };
        match gap.gap_type {
            GapType::Deficient => tally.deficient += 1,
            GapType::Missing   => tally.missing += 1,
            _                  => continue,
        }
        tally.gap_sum += gap.gap;
    }

    let mut aggregates: Vec<SkillAggregate> = tallies
        .into_iter()
        .map(|(skill, tally)| {
            let entries = tally.deficient + tally.missing;
            let average_gap = if entries > 0 {
                round2(tally.gap_sum / entries as f64)
            } else {
                0.0
            };
            SkillAggregate {
                skill: skill.to_string(),
                deficient_count: tally.deficient,
                missing_count: tally.missing,
                average_gap,
            }
        })
        .collect();

    // sort_by is stable
    aggregates.sort_by(|a, b| b.total_gaps().cmp(&a.total_gaps()));
    aggregates
}

/// Compliant vs non-compliant employees over the distinct ids in `skills`.
pub fn compliance_split(gaps: &[GapRecord], skills: &[SkillRecord]) -> ComplianceSplit {
    let employees: HashSet<&str> = skills.iter().map(|s| s.employee_id.as_str()).collect();
    if employees.is_empty() {
        return ComplianceSplit::NoData;
    }

    let non_compliant: HashSet<&str> = gaps
        .iter()
        .filter(|g| g.gap_type.is_gap())
        .map(|g| g.employee_id.as_str())
        .collect();

    ComplianceSplit::Split {
        compliant: employees.len().saturating_sub(non_compliant.len()),
        non_compliant: non_compliant.len(),
    }
}

/// Gap counts grouped by (department, skill), largest first.
pub fn aggregate_department_gaps(gaps: &[GapRecord]) -> Vec<DepartmentSkillGap> {
    let mut counts: IndexMap<(&str, &str), usize> = IndexMap::new();
    for gap in gaps.iter().filter(|g| g.gap_type.is_gap()) {
        *counts
            .entry((gap.department.as_str(), gap.skill.as_str()))
            .or_default() += 1;
    }

    let mut result: Vec<DepartmentSkillGap> = counts
        .into_iter()
        .map(|((department, skill), gap_count)| DepartmentSkillGap {
            department: department.to_string(),
            skill: skill.to_string(),
            gap_count,
        })
        .collect();
    result.sort_by(|a, b| b.gap_count.cmp(&a.gap_count));
    result
}

// ── Dashboard shaping ────────────────────────────────────────────────────────

/// Skills with at least one gap, most affected first, capped at `limit`.
pub fn top_skill_gaps(aggregates: &[SkillAggregate], limit: usize) -> Vec<SkillAggregate> {
    let mut top: Vec<SkillAggregate> = aggregates
        .iter()
        .filter(|a| a.total_gaps() > 0)
        .cloned()
        .collect();
    top.sort_by(|a, b| b.total_gaps().cmp(&a.total_gaps()));
    top.truncate(limit);
    top
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatBand {
    None,
    Low,
    Medium,
    High,
}

impl HeatBand {
    pub fn for_count(count: usize) -> Self {
        match count {
            0     => HeatBand::None,
            1..=2 => HeatBand::Low,
            3..=5 => HeatBand::Medium,
            _     => HeatBand::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentHeatmap {
    pub departments: Vec<String>,
    pub skills: Vec<String>,
    /// cells[d][s] is the gap count for departments[d] × skills[s].
    pub cells: Vec<Vec<usize>>,
}

impl DepartmentHeatmap {
    /// Band for one cell. None when either index is out of range.
    pub fn band(&self, department: usize, skill: usize) -> Option<HeatBand> {
        self.cells
            .get(department)
            .and_then(|row| row.get(skill))
            .map(|&count| HeatBand::for_count(count))
    }
}

/// Department × skill matrix over the first `skill_limit` distinct skills.
pub fn department_heatmap(gaps: &[DepartmentSkillGap], skill_limit: usize) -> DepartmentHeatmap {
    let departments: IndexSet<&str> = gaps.iter().map(|g| g.department.as_str()).collect();
    let skills: IndexSet<&str> = gaps
        .iter()
        .map(|g| g.skill.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .take(skill_limit)
        .collect();

    let mut cells = vec![vec![0usize; skills.len()]; departments.len()];
    for entry in gaps {
        let (Some(d), Some(s)) = (
            departments.get_index_of(entry.department.as_str()),
            skills.get_index_of(entry.skill.as_str()),
        ) else {
            continue;
        };
        cells[d][s] = entry.gap_count;
    }

    DepartmentHeatmap {
        departments: departments.into_iter().map(String::from).collect(),
        skills: skills.into_iter().map(String::from).collect(),
        cells,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
