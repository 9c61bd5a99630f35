use crate::{AnalysisKind, AnalysisReport, RiskLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: String,
    pub timestamp: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: AnalysisKind,
    pub input: String,
    pub result: AnalysisReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    Stable,
    AttentionRequired,
}

impl Posture {
    pub fn label(&self) -> &'static str {
        match self {
            Posture::Stable => "Stable Environment",
            Posture::AttentionRequired => "Attention Required",
        }
    }
}

const ATTENTION_THRESHOLD_PERCENT: u32 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total: usize,
    pub high_risk: usize,
    pub phishing: usize,
    pub logs: usize,
}

impl HistoryStats {
    pub fn from_items(items: &[HistoryItem]) -> Self {
        let mut stats = HistoryStats::default();
        for item in items {
            stats.total += 1;
            if item.result.risk_level() == RiskLevel::High {
                stats.high_risk += 1;
            }
            match item.kind {
                AnalysisKind::Phishing => stats.phishing += 1,
                AnalysisKind::Logs => stats.logs += 1,
            }
        }
        stats
    }

    /// Share of high-risk scans, rounded half up to a whole percent.
    pub fn high_risk_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let scaled = (self.high_risk as u64) * 200 + self.total as u64;
        (scaled / (self.total as u64 * 2)) as u32
    }

    pub fn posture(&self) -> Posture {
        if self.high_risk_percent() > ATTENTION_THRESHOLD_PERCENT {
            Posture::AttentionRequired
        } else {
            Posture::Stable
        }
    }
}
