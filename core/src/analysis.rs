//! Analysis session: the pipeline driver.
//!
//! PIPELINE ORDER (fixed):
//!   1. Decode both tables
//!   2. Compute gaps
//!   3. Aggregate: skills, compliance, department/skill (independent passes)
//!   4. Narrative advisor (optional, only when gaps exist)
//!
//! RULES:
//!   - Steps 1-3 are pure and never fail. Empty tables give empty results.
//!   - An advisor failure is recorded on the outcome; the aggregates
//!     computed in step 3 are kept regardless.
//!   - The session holds one latest outcome. A new run replaces it.

use crate::{
    advisor::{AdvisorInsights, AdvisorRequest, NarrativeAdvisor},
    aggregate::{
        aggregate_department_gaps, aggregate_skills, compliance_split, department_heatmap,
        top_skill_gaps, ComplianceSplit, DepartmentHeatmap, DepartmentSkillGap, SkillAggregate,
    },
    config::AnalysisConfig,
    decoder::{decode_employee_skills, decode_role_requirements, RoleRequirement, SkillRecord},
    gap_engine::{compute_gaps, GapRecord, GapType},
    types::RunId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NO_GAPS_SUMMARY: &str =
    "No significant skill gaps detected with the provided data or all employees are compliant.";

/// What happened at the advisor step of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdvisorOutcome {
    NotRequested,
    /// Gap list was empty, so the advisor was not called.
    NoGaps { insights: AdvisorInsights },
    Completed { insights: AdvisorInsights },
    Failed { message: String },
}

impl AdvisorOutcome {
    pub fn insights(&self) -> Option<&AdvisorInsights> {
        match self {
            AdvisorOutcome::NoGaps { insights } | AdvisorOutcome::Completed { insights } => {
                Some(insights)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapTypeCounts {
    pub missing:   usize,
    pub deficient: usize,
    pub compliant: usize,
    pub exceeds:   usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub run_id:           RunId,
    pub completed_at:     DateTime<Utc>,
    pub skills:           Vec<SkillRecord>,
    pub requirements:     Vec<RoleRequirement>,
    pub gaps:             Vec<GapRecord>,
    pub skill_aggregates: Vec<SkillAggregate>,
    pub compliance:       ComplianceSplit,
    pub department_gaps:  Vec<DepartmentSkillGap>,
    pub advisor:          AdvisorOutcome,
}

impl AnalysisOutcome {
    pub fn insights(&self) -> Option<&AdvisorInsights> {
        self.advisor.insights()
    }

    pub fn gap_type_counts(&self) -> GapTypeCounts {
        let mut counts = GapTypeCounts::default();
        for gap in &self.gaps {
            match gap.gap_type {
                GapType::Missing   => counts.missing += 1,
                GapType::Deficient => counts.deficient += 1,
                GapType::Compliant => counts.compliant += 1,
                GapType::Exceeds   => counts.exceeds += 1,
            }
        }
        counts
    }

    pub fn major_gaps(&self, threshold: f64) -> Vec<&GapRecord> {
        self.gaps.iter().filter(|g| g.is_major(threshold)).collect()
    }

    pub fn top_skill_gaps(&self, limit: usize) -> Vec<SkillAggregate> {
        top_skill_gaps(&self.skill_aggregates, limit)
    }

    pub fn heatmap(&self, skill_limit: usize) -> DepartmentHeatmap {
        department_heatmap(&self.department_gaps, skill_limit)
    }
}

/// Run the full pipeline over already-decoded tables.
pub fn analyze(
    skills: Vec<SkillRecord>,
    requirements: Vec<RoleRequirement>,
    config: &AnalysisConfig,
    advisor: Option<&dyn NarrativeAdvisor>,
) -> AnalysisOutcome {
    let run_id = uuid::Uuid::new_v4().to_string();

    let gaps = compute_gaps(&skills, &requirements);
    let skill_aggregates = aggregate_skills(&gaps, &requirements);
    let compliance = compliance_split(&gaps, &skills);
    let department_gaps = aggregate_department_gaps(&gaps);

    let advisor = match advisor {
        None => AdvisorOutcome::NotRequested,
        Some(_) if gaps.is_empty() => AdvisorOutcome::NoGaps {
            insights: AdvisorInsights::summary_only(NO_GAPS_SUMMARY),
        },
        Some(advisor) => {
            let request = AdvisorRequest::from_inputs(&skills, &requirements, &gaps, &config.advisor);
            match advisor.summarize(&request) {
                Ok(insights) => AdvisorOutcome::Completed { insights },
                Err(e) => {
                    log::warn!("run={run_id} advisor '{}' failed: {e}", advisor.name());
                    AdvisorOutcome::Failed {
                        message: format!("Failed to get AI insights: {e}"),
                    }
                }
            }
        }
    };

    log::info!(
        "run={run_id} analysis complete: {} skill rows, {} requirements, {} gaps",
        skills.len(),
        requirements.len(),
        gaps.len()
    );

    AnalysisOutcome {
        run_id,
        completed_at: Utc::now(),
        skills,
        requirements,
        gaps,
        skill_aggregates,
        compliance,
        department_gaps,
        advisor,
    }
}

/// Holds the loaded tables and the latest outcome. Last write wins.
pub struct AnalysisSession {
    config:       AnalysisConfig,
    skills:       Vec<SkillRecord>,
    requirements: Vec<RoleRequirement>,
    latest:       Option<AnalysisOutcome>,
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            skills: Vec::new(),
            requirements: Vec::new(),
            latest: None,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Decode both tables, replacing anything loaded before.
    /// The previous outcome is discarded.
    pub fn load_tables(&mut self, skills_text: &str, requirements_text: &str) {
        self.skills = decode_employee_skills(skills_text);
        self.requirements = decode_role_requirements(requirements_text);
        self.latest = None;
        log::debug!(
            "session: loaded {} skill rows, {} requirement rows",
            self.skills.len(),
            self.requirements.len()
        );
    }

    pub fn skills(&self) -> &[SkillRecord] {
        &self.skills
    }

    pub fn requirements(&self) -> &[RoleRequirement] {
        &self.requirements
    }

    /// Analyse the loaded tables and keep the result as the latest outcome.
    pub fn run(&mut self, advisor: Option<&dyn NarrativeAdvisor>) -> &AnalysisOutcome {
        let outcome = analyze(
            self.skills.clone(),
            self.requirements.clone(),
            &self.config,
            advisor,
        );
        self.latest.insert(outcome)
    }

    pub fn latest(&self) -> Option<&AnalysisOutcome> {
        self.latest.as_ref()
    }

    pub fn reset(&mut self) {
        self.skills.clear();
        self.requirements.clear();
        self.latest = None;
    }
}
