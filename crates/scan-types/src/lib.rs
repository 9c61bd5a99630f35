use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod history;
pub mod report;

pub use history::{HistoryItem, HistoryStats, Posture};
pub use report::{AnalysisReport, GroundingSource, LogReport, PhishingReport};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Phishing,
    Logs,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Phishing => "phishing",
            AnalysisKind::Logs => "logs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::Phishing => "Phishing & Scam",
            AnalysisKind::Logs => "Log Analyzer",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "phishing" => Ok(AnalysisKind::Phishing),
            "logs" | "log" => Ok(AnalysisKind::Logs),
            other => Err(format!("unknown analysis kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub kind: AnalysisKind,
    pub raw_text: String,
}

impl AnalysisRequest {
    pub fn new(kind: AnalysisKind, raw_text: impl Into<String>) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

/// Severity reported by the model. Only these three values are ever accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "High Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::Low => "Low Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRiskLevel(pub String);

impl fmt::Display for InvalidRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "risk_level must be High|Medium|Low, got {:?}", self.0)
    }
}

impl std::error::Error for InvalidRiskLevel {}

impl FromStr for RiskLevel {
    type Err = InvalidRiskLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(RiskLevel::High),
            "medium" => Ok(RiskLevel::Medium),
            "low" => Ok(RiskLevel::Low),
            _ => Err(InvalidRiskLevel(value.to_string())),
        }
    }
}

impl TryFrom<String> for RiskLevel {
    type Error = InvalidRiskLevel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
