//! gap-runner: headless skills gap analysis.
//!
//! Usage:
//!   gap-runner --skills employees.csv --requirements roles.csv
//!   gap-runner --skills employees.csv --requirements roles.csv --advisor --out-dir reports
//!   gap-runner --skills employees.csv --requirements roles.csv --config gap.json --json

use anyhow::{Context, Result};
use skillgap_core::{
    advisor::advisor_from_settings,
    aggregate::HeatBand,
    analysis::{AdvisorOutcome, AnalysisOutcome, AnalysisSession},
    config::{AnalysisConfig, ReportSettings},
    report::{self, ReportKind},
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let skills_path = find_arg(&args, "--skills").context("--skills <path> is required")?;
    let requirements_path =
        find_arg(&args, "--requirements").context("--requirements <path> is required")?;
    let out_dir = find_arg(&args, "--out-dir");
    let use_advisor = args.iter().any(|a| a == "--advisor");
    let json_mode = args.iter().any(|a| a == "--json");

    let config = match find_arg(&args, "--config") {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    let skills_text = std::fs::read_to_string(skills_path)
        .with_context(|| format!("Cannot read {skills_path}"))?;
    let requirements_text = std::fs::read_to_string(requirements_path)
        .with_context(|| format!("Cannot read {requirements_path}"))?;

    let advisor = if use_advisor && config.advisor.enabled {
        Some(advisor_from_settings(&config.advisor)?)
    } else {
        if use_advisor {
            log::warn!("--advisor given but the advisor is disabled in config");
        }
        None
    };

    let reports = config.reports.clone();
    let mut session = AnalysisSession::new(config);
    session.load_tables(&skills_text, &requirements_text);
    let outcome = session.run(advisor.as_deref());

    if json_mode {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        print_summary(outcome, &reports);
    }

    if let Some(dir) = out_dir {
        let written = report::write_reports(outcome, Path::new(dir), &reports)?;
        if !json_mode {
            println!();
            println!("=== REPORTS ===");
            for path in &written {
                println!("  {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_summary(outcome: &AnalysisOutcome, reports: &ReportSettings) {
    let counts = outcome.gap_type_counts();

    println!("=== ANALYSIS SUMMARY ===");
    println!("  run_id:        {}", outcome.run_id);
    println!("  skill rows:    {}", outcome.skills.len());
    println!("  requirements:  {}", outcome.requirements.len());
    println!("  gap records:   {}", outcome.gaps.len());
    println!("    missing:     {}", counts.missing);
    println!("    deficient:   {}", counts.deficient);
    println!("    compliant:   {}", counts.compliant);
    println!("    exceeds:     {}", counts.exceeds);
    println!(
        "  major gaps:    {}",
        report::row_count(ReportKind::MajorGaps, outcome, reports)
    );

    println!();
    println!("=== COMPLIANCE ===");
    for (label, value) in outcome.compliance.chart_buckets() {
        println!("  {label:<14} {value}");
    }

    println!();
    println!("=== TOP SKILL GAPS ===");
    let top = outcome.top_skill_gaps(reports.top_skill_chart_limit);
    if top.is_empty() {
        println!("  (No skill gaps)");
    }
    for agg in &top {
        println!(
            "  {:<24} deficient: {:>3} | missing: {:>3} | avg gap: {:.2}",
            agg.skill, agg.deficient_count, agg.missing_count, agg.average_gap
        );
    }

    println!();
    println!("=== DEPARTMENT GAPS ===");
    let heatmap = outcome.heatmap(reports.heatmap_skill_limit);
    if heatmap.departments.is_empty() {
        println!("  (No department gaps)");
    }
    for (d, department) in heatmap.departments.iter().enumerate() {
        let cells: Vec<String> = heatmap
            .skills
            .iter()
            .enumerate()
            .zip(&heatmap.cells[d])
            .filter(|(_, count)| **count > 0)
            .map(|((s, skill), count)| {
                let band = heatmap.band(d, s).unwrap_or(HeatBand::None);
                format!("{skill}={count} ({band:?})")
            })
            .collect();
        println!("  {department:<16} {}", cells.join(", "));
    }

    println!();
    println!("=== ADVISOR ===");
    match &outcome.advisor {
        AdvisorOutcome::NotRequested => println!("  (not requested)"),
        AdvisorOutcome::Failed { message } => println!("  error: {message}"),
        AdvisorOutcome::NoGaps { insights } | AdvisorOutcome::Completed { insights } => {
            if let Some(summary) = &insights.overall_summary {
                println!("  {summary}");
            }
            for p in insights.upskilling() {
                println!("  priority: {}: {}", p.skill, p.justification);
            }
            println!(
                "  {} training recommendations, {} hiring suggestions",
                insights.training().len(),
                insights.hiring().len(),
            );
        }
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
