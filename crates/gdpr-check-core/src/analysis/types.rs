use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Overall compliance rating.
///
/// The first four variants form the ordinal scale the model chooses from.
/// `AnalysisError` sits outside that scale and is only produced when the
/// model output could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplianceLevel {
    NonCompliant,
    PartiallyCompliant,
    MostlyCompliant,
    FullyCompliant,
    AnalysisError,
}

impl ComplianceLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NonCompliant => "Non-Compliant",
            Self::PartiallyCompliant => "Partially Compliant",
            Self::MostlyCompliant => "Mostly Compliant",
            Self::FullyCompliant => "Fully Compliant",
            Self::AnalysisError => "Analysis Error",
        }
    }

    /// Position on the ordinal scale, `None` for `AnalysisError`.
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::NonCompliant => Some(0),
            Self::PartiallyCompliant => Some(1),
            Self::MostlyCompliant => Some(2),
            Self::FullyCompliant => Some(3),
            Self::AnalysisError => None,
        }
    }
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplianceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphabetic)
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "noncompliant" => Ok(Self::NonCompliant),
            "partiallycompliant" => Ok(Self::PartiallyCompliant),
            "mostlycompliant" => Ok(Self::MostlyCompliant),
            "fullycompliant" | "compliant" => Ok(Self::FullyCompliant),
            "analysiserror" => Ok(Self::AnalysisError),
            _ => Err(format!("unknown compliance level: {s}")),
        }
    }
}

impl Serialize for ComplianceLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComplianceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Status of one GDPR sub-area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaStatus {
    Compliant,
    Partial,
    #[default]
    Missing,
}

impl<'de> Deserialize<'de> for AreaStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let lowered = raw.trim().to_ascii_lowercase();
        // Models sometimes echo labels like "partially compliant" or "non-compliant"
        Ok(if lowered.starts_with("partial") {
            Self::Partial
        } else if lowered == "compliant" || lowered == "fully compliant" {
            Self::Compliant
        } else {
            Self::Missing
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaAssessment {
    #[serde(default)]
    pub status: AreaStatus,
    #[serde(default)]
    pub details: String,
}

/// The ten GDPR areas every assessment covers. Areas the model leaves out
/// count as `missing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailedAnalysis {
    pub lawful_basis: AreaAssessment,
    pub data_subject_rights: AreaAssessment,
    pub consent_management: AreaAssessment,
    pub dpia: AreaAssessment,
    pub data_retention: AreaAssessment,
    pub data_security: AreaAssessment,
    pub international_transfers: AreaAssessment,
    pub breach_notification: AreaAssessment,
    pub privacy_by_design: AreaAssessment,
    pub record_keeping: AreaAssessment,
}

impl DetailedAnalysis {
    pub fn areas(&self) -> [(&'static str, &AreaAssessment); 10] {
        [
            ("Lawful Basis for Processing", &self.lawful_basis),
            ("Data Subject Rights", &self.data_subject_rights),
            ("Consent Management", &self.consent_management),
            ("Data Protection Impact Assessment", &self.dpia),
            ("Data Retention", &self.data_retention),
            ("Data Security", &self.data_security),
            ("International Transfers", &self.international_transfers),
            ("Breach Notification", &self.breach_notification),
            ("Privacy by Design", &self.privacy_by_design),
            ("Record Keeping", &self.record_keeping),
        ]
    }
}

/// Structured compliance assessment produced by the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(deserialize_with = "deserialize_score")]
    pub overall_score: u8,
    pub compliance_level: ComplianceLevel,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_analysis: Option<DetailedAnalysis>,
    /// Unparsed model output, kept only for degraded results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// The model answered, but not with a JSON object.
    #[must_use]
    pub fn unstructured(raw: &str) -> Self {
        Self {
            overall_score: 50,
            compliance_level: ComplianceLevel::PartiallyCompliant,
            summary: "Analysis completed but response format needs adjustment".into(),
            strengths: vec!["Document was successfully analyzed".into()],
            weaknesses: vec!["Response format could not be parsed as JSON".into()],
            recommendations: vec![
                "Please review the document manually for detailed compliance assessment".into(),
            ],
            detailed_analysis: None,
            raw_response: Some(raw.to_string()),
            error: None,
        }
    }

    /// The model produced something JSON-shaped that did not parse.
    #[must_use]
    pub fn unparseable(raw: &str, error: impl Into<String>) -> Self {
        Self {
            overall_score: 0,
            compliance_level: ComplianceLevel::AnalysisError,
            summary: "Failed to parse compliance analysis".into(),
            strengths: Vec::new(),
            weaknesses: vec!["Analysis could not be completed".into()],
            recommendations: vec!["Please try uploading the document again".into()],
            detailed_analysis: None,
            raw_response: Some(raw.to_string()),
            error: Some(error.into()),
        }
    }

    pub const fn is_degraded(&self) -> bool {
        self.raw_response.is_some()
    }
}

fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let score = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| serde::de::Error::custom(format!("invalid overall score: {value}")))?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(score.round().clamp(0.0, 100.0) as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let lowered = raw.trim().to_ascii_lowercase();
        Ok(if lowered.starts_with("high") {
            Self::High
        } else if lowered.starts_with("low") {
            Self::Low
        } else {
            Self::Medium
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvement {
    pub priority: Priority,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub implementation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_text: Option<String>,
    #[serde(default)]
    pub timeline: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementSuggestions {
    #[serde(default)]
    pub prioritized_improvements: Vec<Improvement>,
}

impl ImprovementSuggestions {
    /// Used when the model's suggestions cannot be parsed.
    #[must_use]
    pub fn generic() -> Self {
        Self {
            prioritized_improvements: vec![Improvement {
                priority: Priority::High,
                area: "General Compliance".into(),
                description: "Review and update privacy policy based on analysis results".into(),
                implementation: "Consult with legal team and update documentation".into(),
                template_text: Some(
                    "Contact legal counsel for specific language recommendations".into(),
                ),
                timeline: "30-60 days".into(),
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.prioritized_improvements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prioritized_improvements.is_empty()
    }
}
