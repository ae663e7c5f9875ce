use tracing::warn;

use super::types::{AnalysisResult, ImprovementSuggestions};

/// Removes a surrounding markdown code fence, with or without a language tag.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// The span from the first `{` to the last `}`, if any.
pub fn outer_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Interprets raw model output as an analysis result, degrading instead of
/// failing when the output is not usable.
pub fn parse_analysis(raw: &str) -> AnalysisResult {
    let Some(object) = outer_json_object(strip_code_fence(raw)) else {
        warn!("Model output contained no JSON object");
        return AnalysisResult::unstructured(raw);
    };

    match serde_json::from_str::<AnalysisResult>(object) {
        Ok(mut result) => {
            // Never trust the model to fill these
            result.raw_response = None;
            result.error = None;
            result
        }
        Err(e) => {
            warn!(error = %e, "Model output could not be parsed as an analysis");
            AnalysisResult::unparseable(raw, e.to_string())
        }
    }
}

/// Interprets raw model output as improvement suggestions, falling back to a
/// single generic item.
pub fn parse_improvements(raw: &str) -> ImprovementSuggestions {
    let parsed = outer_json_object(strip_code_fence(raw))
        .ok_or_else(|| "no JSON object".to_string())
        .and_then(|object| {
            serde_json::from_str::<ImprovementSuggestions>(object).map_err(|e| e.to_string())
        });

    match parsed {
        Ok(suggestions) => suggestions,
        Err(e) => {
            warn!(error = %e, "Improvement suggestions could not be parsed");
            ImprovementSuggestions::generic()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AreaStatus, ComplianceLevel, Priority};

    const ANALYSIS_JSON: &str = r#"{
        "overallScore": 64,
        "complianceLevel": "Partially Compliant",
        "summary": "Covers the basics",
        "strengths": ["Names a controller"],
        "weaknesses": ["No retention periods"],
        "recommendations": ["State retention periods"],
        "detailedAnalysis": {
            "lawfulBasis": {"status": "compliant", "details": "Art. 6(1)(b)"},
            "dataSubjectRights": {"status": "partial", "details": "Erasure only"},
            "consentManagement": {"status": "missing", "details": ""},
            "dpia": {"status": "missing", "details": ""},
            "dataRetention": {"status": "missing", "details": ""},
            "dataSecurity": {"status": "partial", "details": "TLS"},
            "internationalTransfers": {"status": "missing", "details": ""},
            "breachNotification": {"status": "missing", "details": ""},
            "privacyByDesign": {"status": "missing", "details": ""},
            "recordKeeping": {"status": "missing", "details": ""}
        }
    }"#;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_outer_json_object() {
        assert_eq!(outer_json_object("Sure! {\"a\":{\"b\":1}} done"), Some("{\"a\":{\"b\":1}}"));
        assert_eq!(outer_json_object("no braces here"), None);
        assert_eq!(outer_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_clean_analysis() {
        let result = parse_analysis(ANALYSIS_JSON);

        assert_eq!(result.overall_score, 64);
        assert_eq!(result.compliance_level, ComplianceLevel::PartiallyCompliant);
        assert!(!result.is_degraded());
        let detailed = result.detailed_analysis.unwrap();
        assert_eq!(detailed.lawful_basis.status, AreaStatus::Compliant);
        assert_eq!(detailed.data_subject_rights.status, AreaStatus::Partial);
    }

    #[test]
    fn test_parse_fenced_analysis_with_chatter() {
        let raw = format!("Here is the analysis:\n```json\n{ANALYSIS_JSON}\n```");

        let result = parse_analysis(&raw);

        assert_eq!(result.overall_score, 64);
        assert!(!result.is_degraded());
    }

    #[test]
    fn test_partial_detail_keeps_score() {
        let raw = r#"{
            "overallScore": 72,
            "complianceLevel": "Mostly Compliant",
            "detailedAnalysis": {
                "lawfulBasis": {"status": "compliant", "details": "Contract"},
                "dataSecurity": {"details": "Encrypted at rest"}
            }
        }"#;

        let result = parse_analysis(raw);

        assert_eq!(result.overall_score, 72);
        assert_eq!(result.compliance_level, ComplianceLevel::MostlyCompliant);
        assert!(!result.is_degraded());
        let detailed = result.detailed_analysis.unwrap();
        assert_eq!(detailed.lawful_basis.status, AreaStatus::Compliant);
        assert_eq!(detailed.data_security.status, AreaStatus::Missing);
        assert_eq!(detailed.data_security.details, "Encrypted at rest");
        assert_eq!(detailed.data_subject_rights.status, AreaStatus::Missing);
        assert!(detailed.record_keeping.details.is_empty());
        assert_eq!(detailed.areas().len(), 10);
    }

    #[test]
    fn test_parse_analysis_without_json_degrades() {
        let raw = "The policy looks mostly fine to me.";

        let result = parse_analysis(raw);

        assert_eq!(result.overall_score, 50);
        assert_eq!(result.compliance_level, ComplianceLevel::PartiallyCompliant);
        assert_eq!(result.raw_response.as_deref(), Some(raw));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_parse_malformed_json_degrades_to_error() {
        let raw = r#"{"overallScore": 70, "complianceLevel": "Mostly Compliant", "summary": }"#;

        let result = parse_analysis(raw);

        assert_eq!(result.overall_score, 0);
        assert_eq!(result.compliance_level, ComplianceLevel::AnalysisError);
        assert!(result.error.is_some());
        assert_eq!(result.raw_response.as_deref(), Some(raw));
    }

    #[test]
    fn test_parse_improvements() {
        let raw = r#"```json
        {"prioritizedImprovements": [
            {"priority": "Medium", "area": "Data Retention", "description": "Add periods",
             "implementation": "Update section 4", "templateText": "We keep data for 2 years.",
             "timeline": "2 weeks"}
        ]}
        ```"#;

        let suggestions = parse_improvements(raw);

        assert_eq!(suggestions.len(), 1);
        let item = &suggestions.prioritized_improvements[0];
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.template_text.as_deref(), Some("We keep data for 2 years."));
    }

    #[test]
    fn test_unparseable_improvements_fall_back() {
        assert_eq!(parse_improvements("sorry, no"), ImprovementSuggestions::generic());
        assert_eq!(
            parse_improvements("{\"prioritizedImprovements\": 3}"),
            ImprovementSuggestions::generic()
        );
    }
}
