use skillgap_core::{
    advisor::StaticAdvisor,
    aggregate::ComplianceSplit,
    analysis::{AdvisorOutcome, AnalysisSession, NO_GAPS_SUMMARY},
    config::AnalysisConfig,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

const SKILLS: &str = "\
employee_id,name,department,role,skill,skill_level
E1,Alice,Eng,Dev,Python,2
E2,Bob,Eng,Dev,Python,4
E2,Bob,Eng,Dev,SQL,3
";

const REQUIREMENTS: &str = "\
role,required_skill,required_level
Dev,Python,4
Dev,SQL,3
";

fn session() -> AnalysisSession {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = AnalysisSession::new(AnalysisConfig::default_test());
    session.load_tables(SKILLS, REQUIREMENTS);
    session
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Full pipeline without an advisor.
#[test]
fn run_without_advisor() {
    let mut session = session();
    let outcome = session.run(None);

    assert_eq!(outcome.skills.len(), 3);
    assert_eq!(outcome.requirements.len(), 2);
    assert_eq!(outcome.gaps.len(), 4);
    assert_eq!(
        outcome.compliance,
        ComplianceSplit::Split { compliant: 1, non_compliant: 1 }
    );
    assert_eq!(outcome.advisor, AdvisorOutcome::NotRequested);

    let counts = outcome.gap_type_counts();
    assert_eq!((counts.deficient, counts.missing, counts.compliant, counts.exceeds), (1, 1, 2, 0));
}

/// Advisor insights are attached when gaps exist.
#[test]
fn run_with_advisor() {
    let advisor = StaticAdvisor::replying(r#"{"overallSummary":"Python is weak."}"#);
    let mut session = session();
    let outcome = session.run(Some(&advisor));

    assert_eq!(advisor.calls(), 1);
    let insights = outcome.insights().expect("insights present");
    assert_eq!(insights.overall_summary.as_deref(), Some("Python is weak."));
}

/// An advisor failure keeps every local aggregate.
#[test]
fn advisor_failure_keeps_aggregates() {
    let advisor = StaticAdvisor::failing("quota exceeded");
    let mut session = session();
    let outcome = session.run(Some(&advisor));

    match &outcome.advisor {
        AdvisorOutcome::Failed { message } => assert!(message.contains("quota exceeded")),
        other => panic!("expected a failed advisor outcome, got {other:?}"),
    }
    assert!(outcome.insights().is_none());
    assert_eq!(outcome.gaps.len(), 4);
    assert!(!outcome.skill_aggregates.is_empty());
    assert!(!outcome.department_gaps.is_empty());
}

/// An invalid advisor reply is a failure, not an empty answer.
#[test]
fn invalid_advisor_reply_is_failure() {
    let advisor = StaticAdvisor::replying("not json");
    let mut session = session();
    let outcome = session.run(Some(&advisor));
    assert!(matches!(outcome.advisor, AdvisorOutcome::Failed { .. }));
}

/// With no gaps the advisor is skipped and a fixed summary recorded.
#[test]
fn no_gaps_skips_advisor() {
    let advisor = StaticAdvisor::replying("{}");
    let mut session = AnalysisSession::new(AnalysisConfig::default_test());
    session.load_tables("E1,Alice,Eng,Designer,Figma,3", "Dev,Python,4");

    let outcome = session.run(Some(&advisor));

    assert_eq!(advisor.calls(), 0, "advisor must not be called without gaps");
    assert!(outcome.gaps.is_empty());
    assert_eq!(
        outcome.insights().and_then(|i| i.overall_summary.as_deref()),
        Some(NO_GAPS_SUMMARY)
    );
}

/// Empty tables are valid: no gaps and the no-data compliance sentinel.
#[test]
fn empty_tables_are_not_an_error() {
    let mut session = AnalysisSession::new(AnalysisConfig::default_test());
    session.load_tables("", "");
    let outcome = session.run(None);

    assert!(outcome.gaps.is_empty());
    assert!(outcome.skill_aggregates.is_empty());
    assert_eq!(outcome.compliance, ComplianceSplit::NoData);
}

/// The latest outcome is replaced by each run and cleared on reload.
#[test]
fn latest_outcome_last_write_wins() {
    let mut session = session();
    assert!(session.latest().is_none());

    let first = session.run(None).run_id.clone();
    let second = session.run(None).run_id.clone();
    assert_ne!(first, second, "each run gets its own id");
    assert_eq!(session.latest().map(|o| o.run_id.as_str()), Some(second.as_str()));

    session.load_tables("E9,Zed,Ops,SRE,Linux,1", "SRE,Linux,3");
    assert!(session.latest().is_none(), "reload must drop the stale outcome");
    assert_eq!(session.skills().len(), 1);

    session.reset();
    assert!(session.skills().is_empty());
    assert!(session.requirements().is_empty());
}

/// The outcome serializes for JSON consumers.
#[test]
fn outcome_serializes_to_json() {
    let mut session = session();
    let outcome = session.run(None);
    let json = serde_json::to_value(outcome).unwrap();

    assert_eq!(json["advisor"]["status"], "not_requested");
    assert_eq!(json["compliance"]["kind"], "split");
    assert_eq!(json["gaps"][0]["gap_type"], "deficient");
    assert!(json["skill_aggregates"][0].get("deficientCount").is_some());
}
