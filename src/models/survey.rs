use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialUseful {
    Yes,
    No,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    Definitely,
    Probably,
    Unknown,
    ProbablyNot,
    DefinitelyNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiExperience {
    Nothing,
    Reading,
    TeamUsing,
    Attempts,
}

impl MaterialUseful {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialUseful::Yes => "yes",
            MaterialUseful::No => "no",
            MaterialUseful::Unknown => "unknown",
        }
    }
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Definitely => "definitely",
            Recommendation::Probably => "probably",
            Recommendation::Unknown => "unknown",
            Recommendation::ProbablyNot => "probably-not",
            Recommendation::DefinitelyNot => "definitely-not",
        }
    }
}

impl AiExperience {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiExperience::Nothing => "nothing",
            AiExperience::Reading => "reading",
            AiExperience::TeamUsing => "team-using",
            AiExperience::Attempts => "attempts",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingInfo {
    #[serde(default)]
    pub enough: bool,
    #[serde(default)]
    pub need_practice: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiServices {
    #[serde(default)]
    pub not_using: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacles {
    #[serde(default)]
    pub nothing: bool,
    #[serde(default)]
    pub data_security: bool,
    #[serde(default)]
    pub access_payment: bool,
    #[serde(default)]
    pub low_quality: bool,
    #[serde(default)]
    pub specific_product: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One submitted feedback form. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    #[serde(default)]
    pub id: String,
    pub full_name: String,
    pub contacts: String,
    pub occupation: String,
    pub material_useful: MaterialUseful,
    pub recommendation: Recommendation,
    pub ai_experience: AiExperience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_info: Option<MissingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_services: Option<AiServices>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obstacles: Option<Obstacles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

const CSV_HEADER: [&str; 7] = [
    "Full name",
    "Contacts",
    "Occupation",
    "Material useful",
    "Recommendation",
    "AI experience",
    "Submitted",
];

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Renders survey responses as CSV for the admin export
pub fn export_csv(responses: &[SurveyResponse]) -> String {
    let mut out = CSV_HEADER.join(",");
    for response in responses {
        let row = [
            csv_field(&response.full_name),
            csv_field(&response.contacts),
            csv_field(&response.occupation),
            response.material_useful.as_str().to_string(),
            response.recommendation.as_str().to_string(),
            response.ai_experience.as_str().to_string(),
            response.submitted_at.format("%Y-%m-%d").to_string(),
        ];
        out.push('\n');
        out.push_str(&row.join(","));
    }
    out.push('\n');
    out
}
