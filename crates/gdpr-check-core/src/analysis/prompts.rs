use super::types::AnalysisResult;

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a GDPR compliance expert. Analyze documents for \
GDPR compliance and provide detailed, structured feedback. Always respond with valid JSON only, \
no markdown formatting.";

pub const IMPROVEMENTS_SYSTEM_PROMPT: &str =
    "You are a GDPR implementation specialist. Respond with valid JSON only, no markdown formatting.";

const AREAS: [(&str, &str); 10] = [
    (
        "Lawful Basis for Processing",
        "Are the legal grounds for processing personal data stated?",
    ),
    (
        "Data Subject Rights",
        "Are access, rectification, erasure and the other individual rights explained?",
    ),
    (
        "Consent Management",
        "How is consent obtained, recorded and withdrawn?",
    ),
    (
        "Data Protection Impact Assessment (DPIA)",
        "Are high-risk processing activities identified and assessed?",
    ),
    (
        "Data Retention",
        "Are retention periods specified and justified?",
    ),
    ("Data Security", "Which technical and organisational measures are described?"),
    (
        "International Transfers",
        "How are transfers outside the EU safeguarded?",
    ),
    (
        "Breach Notification",
        "Is there a procedure for notifying authorities and data subjects of breaches?",
    ),
    (
        "Privacy by Design",
        "Is privacy built into systems and defaults?",
    ),
    (
        "Record Keeping",
        "Are processing activities documented?",
    ),
];

const ANALYSIS_SCHEMA: &str = r#"{
  "overallScore": 0-100,
  "complianceLevel": "Non-Compliant" | "Partially Compliant" | "Mostly Compliant" | "Fully Compliant",
  "summary": "Brief overview of compliance status",
  "strengths": ["Compliant areas"],
  "weaknesses": ["Non-compliant or missing areas"],
  "recommendations": ["Specific actionable recommendations"],
  "detailedAnalysis": {
    "lawfulBasis": {"status": "compliant" | "partial" | "missing", "details": "explanation"},
    "dataSubjectRights": {"status": "...", "details": "..."},
    "consentManagement": {"status": "...", "details": "..."},
    "dpia": {"status": "...", "details": "..."},
    "dataRetention": {"status": "...", "details": "..."},
    "dataSecurity": {"status": "...", "details": "..."},
    "internationalTransfers": {"status": "...", "details": "..."},
    "breachNotification": {"status": "...", "details": "..."},
    "privacyByDesign": {"status": "...", "details": "..."},
    "recordKeeping": {"status": "...", "details": "..."}
  }
}"#;

const IMPROVEMENTS_SCHEMA: &str = r#"{
  "prioritizedImprovements": [
    {
      "priority": "High" | "Medium" | "Low",
      "area": "GDPR area name",
      "description": "What needs to be improved",
      "implementation": "Step-by-step guidance",
      "templateText": "Suggested clause or language to add",
      "timeline": "Recommended timeframe"
    }
  ]
}"#;

pub fn analysis_prompt(content: &str, document_name: &str) -> String {
    let areas = AREAS
        .iter()
        .enumerate()
        .map(|(i, (name, question))| format!("{}. **{name}** - {question}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following document for GDPR compliance and cover each of these areas.\n\n\
         Document Name: {document_name}\n\n\
         GDPR Compliance Areas:\n{areas}\n\n\
         Respond with ONLY valid JSON in this shape, with no markdown, code blocks or backticks:\n\
         {ANALYSIS_SCHEMA}\n\n\
         Document Content:\n{content}\n"
    )
}

pub fn improvements_prompt(analysis: &AnalysisResult) -> String {
    format!(
        "Based on the following GDPR compliance analysis, suggest specific, actionable improvements.\n\n\
         Analysis Summary: {}\n\
         Compliance Level: {}\n\
         Current Weaknesses: {}\n\n\
         For each improvement give a priority (High, Medium, Low), implementation steps, \
         template language that could be added, and a timeline.\n\n\
         Respond with ONLY valid JSON in this shape, with no markdown, code blocks or backticks:\n\
         {IMPROVEMENTS_SCHEMA}\n",
        analysis.summary,
        analysis.compliance_level,
        analysis.weaknesses.join(", "),
    )
}
