use anyhow::Result;
use console::style;
use gdpr_check_core::analysis::{AreaStatus, Priority};
use gdpr_check_core::{AnalysisResult, ComplianceLevel, ImprovementSuggestions, Report, ReportState};

/// Writes a report to stdout.
pub fn print(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{}", style(&report.document_name).bold());
    println!("  Report: {}", report.id);
    println!("  Requested: {}", report.created_at.format("%Y-%m-%d %H:%M:%S UTC"));

    match &report.state {
        ReportState::Processing => println!("  Status: {}", style("processing").yellow()),
        ReportState::Failed { error } => {
            println!("  Status: {}", style("failed").red());
            println!("  Error: {error}");
        }
        ReportState::Completed {
            analysis,
            improvements,
            completed_at,
        } => {
            println!("  Completed: {}", completed_at.format("%Y-%m-%d %H:%M:%S UTC"));
            print_analysis(analysis);
            print_improvements(improvements);
        }
    }

    Ok(())
}

fn print_analysis(analysis: &AnalysisResult) {
    let level = match analysis.compliance_level {
        ComplianceLevel::FullyCompliant | ComplianceLevel::MostlyCompliant => {
            style(analysis.compliance_level).green()
        }
        ComplianceLevel::PartiallyCompliant => style(analysis.compliance_level).yellow(),
        ComplianceLevel::NonCompliant | ComplianceLevel::AnalysisError => {
            style(analysis.compliance_level).red()
        }
    };

    println!();
    println!("{} {}/100  {level}", style("Score").bold(), analysis.overall_score);
    if !analysis.summary.is_empty() {
        println!("  {}", analysis.summary);
    }
    if let Some(error) = &analysis.error {
        println!("  {} {error}", style("Model output could not be parsed:").dim());
    }

    print_list("Strengths", &analysis.strengths);
    print_list("Weaknesses", &analysis.weaknesses);
    print_list("Recommendations", &analysis.recommendations);

    if let Some(detail) = &analysis.detailed_analysis {
        println!();
        println!("{}", style("Areas").bold());
        for (name, area) in detail.areas() {
            let marker = match area.status {
                AreaStatus::Compliant => style("●").green(),
                AreaStatus::Partial => style("◐").yellow(),
                AreaStatus::Missing => style("○").red(),
            };
            println!("  {marker} {name}");
            if !area.details.is_empty() {
                println!("    {}", style(&area.details).dim());
            }
        }
    }
}

fn print_improvements(improvements: &ImprovementSuggestions) {
    if improvements.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Improvements").bold());
    for item in &improvements.prioritized_improvements {
        let priority = match item.priority {
            Priority::High => style("high").red(),
            Priority::Medium => style("medium").yellow(),
            Priority::Low => style("low").dim(),
        };
        println!("  [{priority}] {}", style(&item.area).bold());
        println!("    {}", item.description);
        if !item.implementation.is_empty() {
            println!("    How: {}", item.implementation);
        }
        if !item.timeline.is_empty() {
            println!("    When: {}", item.timeline);
        }
        if let Some(template) = &item.template_text {
            println!("    Template: {}", style(template).dim());
        }
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", style(title).bold());
    for item in items {
        println!("  - {item}");
    }
}
