use std::fmt::Write;

use crate::models::{Feedback, Report, Role};

pub fn build_report_list(reports: &[&Report]) -> String {
    let mut output = String::new();

    if reports.is_empty() {
        let _ = writeln!(output, "No reports match your filters.");
        return output;
    }

    for report in reports {
        let _ = writeln!(
            output,
            "- [{}] {} ({}, {}) confidence {}%",
            report.id, report.title, report.report_type, report.industry, report.confidence_score
        );
    }

    output
}

/// Full detail view for one report: summary, confidence, sources, then the
/// role-gated feedback section. `feedbacks` is only populated for reviewers.
pub fn build_report_detail(
    report: &Report,
    role: Role,
    feedbacks: Option<&[Feedback]>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", report.title);
    let _ = writeln!(output, "{}", report.summary);
    let _ = writeln!(output);
    let _ = writeln!(output, "Type: {}", report.report_type);
    let _ = writeln!(output, "Industry: {}", report.industry);
    let _ = writeln!(output, "Confidence: {}%", report.confidence_score);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Why We Trust This");

    if report.sources.is_empty() {
        let _ = writeln!(output, "No sources available.");
    } else {
        for source in report.sources.iter() {
            let _ = writeln!(
                output,
                "- {}: {} (relevance {}%)",
                source.origin,
                source.excerpt,
                (source.relevance_score * 100.0).round() as i64
            );
        }
    }

    match role {
        Role::Viewer => {
            let _ = writeln!(output);
            let _ = writeln!(output, "## Submit Feedback");
            let _ = writeln!(
                output,
                "Use `report-console feedback --report {} --on <section>=<comment>`.",
                report.id
            );
        }
        Role::Reviewer => {
            let _ = writeln!(output);
            let _ = writeln!(output, "## Submitted Feedback");
            let _ = write!(output, "{}", build_feedback_list(feedbacks.unwrap_or(&[])));
        }
        Role::Admin => {}
    }

    output
}

pub fn build_feedback_list(feedbacks: &[Feedback]) -> String {
    let mut output = String::new();

    if feedbacks.is_empty() {
        let _ = writeln!(output, "No feedback submitted yet.");
        return output;
    }

    for feedback in feedbacks.iter() {
        let _ = writeln!(output, "- Comment: {}", feedback.user_comment);
        let _ = writeln!(output, "  Section: {}", feedback.flagged_section);
        if let Some(email) = &feedback.email {
            let _ = writeln!(output, "  By: {email}");
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;

    fn report() -> Report {
        Report {
            id: "rep-9".to_string(),
            title: "EV Batteries".to_string(),
            summary: "Supply outlook.".to_string(),
            report_type: "Market".to_string(),
            industry: "Automotive".to_string(),
            confidence_score: 87,
            sources: vec![Source {
                origin: "IEA".to_string(),
                excerpt: "Demand doubled.".to_string(),
                relevance_score: 0.92,
            }],
        }
    }

    #[test]
    fn detail_includes_sources_and_confidence() {
        let out = build_report_detail(&report(), Role::Admin, None);
        assert!(out.contains("Confidence: 87%"));
        assert!(out.contains("- IEA: Demand doubled. (relevance 92%)"));
    }

    #[test]
    fn viewer_sees_the_submission_hint() {
        let out = build_report_detail(&report(), Role::Viewer, None);
        assert!(out.contains("## Submit Feedback"));
        assert!(out.contains("--report rep-9"));
        assert!(!out.contains("## Submitted Feedback"));
    }

    #[test]
    fn reviewer_sees_the_feedback_list() {
        let feedbacks = vec![Feedback {
            report_id: "rep-9".to_string(),
            user_comment: "summary: Good".to_string(),
            flagged_section: "summary".to_string(),
            email: Some("jules@example.com".to_string()),
        }];
        let out = build_report_detail(&report(), Role::Reviewer, Some(&feedbacks));
        assert!(out.contains("## Submitted Feedback"));
        assert!(out.contains("- Comment: summary: Good"));
        assert!(out.contains("By: jules@example.com"));
    }

    #[test]
    fn reviewer_with_no_feedback_sees_the_empty_message() {
        let out = build_report_detail(&report(), Role::Reviewer, Some(&[]));
        assert!(out.contains("No feedback submitted yet."));
    }

    #[test]
    fn empty_list_has_its_own_message() {
        assert!(build_report_list(&[]).contains("No reports match your filters."));
    }
}
