use crate::models::Report;

pub const CONFIDENCE_THRESHOLDS: [i32; 3] = [70, 80, 90];

/// Client-side filter over an already-fetched report collection. An unset
/// field means that predicate always passes.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub report_type: Option<String>,
    pub industry: Option<String>,
    pub min_confidence: Option<i32>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        let matches_type = self
            .report_type
            .as_deref()
            .map_or(true, |t| report.report_type == t);
        let matches_industry = self
            .industry
            .as_deref()
            .map_or(true, |i| report.industry == i);
        let matches_confidence = self
            .min_confidence
            .map_or(true, |min| report.confidence_score >= min);
        matches_type && matches_industry && matches_confidence
    }

    pub fn apply<'a>(&self, reports: &'a [Report]) -> Vec<&'a Report> {
        reports.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Distinct values of one report field, in first-seen order. Used to hint
/// which filter values exist in the fetched set.
pub fn distinct_values<F>(reports: &[Report], field: F) -> Vec<String>
where
    F: Fn(&Report) -> &str,
{
    let mut values: Vec<String> = Vec::new();
    for report in reports {
        let value = field(report);
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, report_type: &str, industry: &str, confidence: i32) -> Report {
        Report {
            id: id.to_string(),
            title: format!("Report {id}"),
            summary: "A summary.".to_string(),
            report_type: report_type.to_string(),
            industry: industry.to_string(),
            confidence_score: confidence,
            sources: Vec::new(),
        }
    }

    fn sample() -> Vec<Report> {
        vec![
            report("r1", "Market", "Automotive", 85),
            report("r2", "Market", "Energy", 72),
            report("r3", "Patent", "Automotive", 91),
            report("r4", "Market", "Healthcare", 80),
        ]
    }

    #[test]
    fn empty_filter_passes_everything() {
        let reports = sample();
        let filtered = ReportFilter::default().apply(&reports);
        assert_eq!(filtered.len(), reports.len());
    }

    #[test]
    fn type_and_confidence_conjunction() {
        let reports = sample();
        let filter = ReportFilter {
            report_type: Some("Market".to_string()),
            industry: None,
            min_confidence: Some(80),
        };
        let filtered = filter.apply(&reports);
        let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r1", "r4"]);
    }

    #[test]
    fn industry_match_is_exact() {
        let reports = sample();
        let filter = ReportFilter {
            report_type: None,
            industry: Some("Automotive".to_string()),
            min_confidence: None,
        };
        let filtered = filter.apply(&reports);
        assert!(filtered.iter().all(|r| r.industry == "Automotive"));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn threshold_is_greater_or_equal() {
        let reports = vec![report("r1", "Market", "Energy", 80)];
        let filter = ReportFilter {
            report_type: None,
            industry: None,
            min_confidence: Some(80),
        };
        assert_eq!(filter.apply(&reports).len(), 1);
    }

    #[test]
    fn distinct_values_preserve_first_seen_order() {
        let reports = sample();
        let types = distinct_values(&reports, |r| &r.report_type);
        assert_eq!(types, ["Market", "Patent"]);
        let industries = distinct_values(&reports, |r| &r.industry);
        assert_eq!(industries, ["Automotive", "Energy", "Healthcare"]);
    }
}
