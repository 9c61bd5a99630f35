use crate::{AnalysisKind, RiskLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroundingSource {
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

impl GroundingSource {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.uri
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhishingReport {
    pub threat_type: String,
    pub risk_level: RiskLevel,
    pub explanation: String,
    pub recommended_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_sources: Option<Vec<GroundingSource>>,
}

/// Canonical log report. Older snapshots used `potential_attack` and
/// `mitigation_steps`; both are still read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawLogReport")]
pub struct LogReport {
    pub suspicious_activity: bool,
    pub detected_patterns: Vec<String>,
    pub possible_attack: String,
    pub risk_level: RiskLevel,
    pub explanation: String,
    pub recommended_actions: Vec<String>,
}

#[derive(Deserialize)]
struct RawLogReport {
    #[serde(default)]
    suspicious_activity: Option<bool>,
    #[serde(default)]
    detected_patterns: Vec<String>,
    #[serde(alias = "potential_attack")]
    possible_attack: String,
    risk_level: RiskLevel,
    explanation: String,
    #[serde(alias = "mitigation_steps")]
    recommended_actions: Vec<String>,
}

impl From<RawLogReport> for LogReport {
    fn from(raw: RawLogReport) -> Self {
        let suspicious_activity = raw
            .suspicious_activity
            .unwrap_or(raw.risk_level != RiskLevel::Low);
        Self {
            suspicious_activity,
            detected_patterns: raw.detected_patterns,
            possible_attack: raw.possible_attack,
            risk_level: raw.risk_level,
            explanation: raw.explanation,
            recommended_actions: raw.recommended_actions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AnalysisReport {
    Phishing(PhishingReport),
    Logs(LogReport),
}

impl AnalysisReport {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisReport::Phishing(_) => AnalysisKind::Phishing,
            AnalysisReport::Logs(_) => AnalysisKind::Logs,
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        match self {
            AnalysisReport::Phishing(report) => report.risk_level,
            AnalysisReport::Logs(report) => report.risk_level,
        }
    }

    /// Threat classification for phishing, suspected attack for logs.
    pub fn headline(&self) -> &str {
        match self {
            AnalysisReport::Phishing(report) => &report.threat_type,
            AnalysisReport::Logs(report) => &report.possible_attack,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            AnalysisReport::Phishing(report) => &report.explanation,
            AnalysisReport::Logs(report) => &report.explanation,
        }
    }

    pub fn actions(&self) -> &[String] {
        match self {
            AnalysisReport::Phishing(report) => &report.recommended_actions,
            AnalysisReport::Logs(report) => &report.recommended_actions,
        }
    }

    pub fn sources(&self) -> &[GroundingSource] {
        match self {
            AnalysisReport::Phishing(report) => {
                report.grounding_sources.as_deref().unwrap_or_default()
            }
            AnalysisReport::Logs(_) => &[],
        }
    }
}
