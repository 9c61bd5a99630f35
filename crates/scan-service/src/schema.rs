//! Response schemas sent with every request. The model must answer with an
//! object of exactly this shape; anything else is a failed scan.

use scan_types::{AnalysisKind, RiskLevel};
use serde_json::{json, Value};

fn risk_level_property(description: &str) -> Value {
    let levels: Vec<&str> = RiskLevel::ALL.iter().map(RiskLevel::as_str).collect();
    json!({
        "type": "STRING",
        "enum": levels,
        "description": description,
    })
}

fn string_list(description: &str) -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" },
        "description": description,
    })
}

pub fn phishing_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "threat_type": {
                "type": "STRING",
                "description": "The category of the threat (e.g., Phishing, Smishing, WhatsApp Scam, Fake Offer).",
            },
            "risk_level": risk_level_property("Severity level: High, Medium, or Low."),
            "explanation": {
                "type": "STRING",
                "description": "A simple, jargon-free explanation of why this is risky.",
            },
            "recommended_actions": string_list("Clear steps for the user to stay safe."),
        },
        "required": ["threat_type", "risk_level", "explanation", "recommended_actions"],
    })
}

pub fn logs_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suspicious_activity": {
                "type": "BOOLEAN",
                "description": "Whether the logs show anything that needs attention.",
            },
            "detected_patterns": string_list("Key suspicious events found in the logs."),
            "possible_attack": {
                "type": "STRING",
                "description": "The name of the suspected attack (e.g., Brute Force, Credential Stuffing).",
            },
            "risk_level": risk_level_property("Severity level: High, Medium, or Low."),
            "explanation": {
                "type": "STRING",
                "description": "A simple explanation of the risk for non-technical users.",
            },
            "recommended_actions": string_list("Immediate steps to secure the system."),
        },
        "required": [
            "suspicious_activity",
            "detected_patterns",
            "possible_attack",
            "risk_level",
            "explanation",
            "recommended_actions"
        ],
    })
}

pub fn response_schema(kind: AnalysisKind) -> Value {
    match kind {
        AnalysisKind::Phishing => phishing_schema(),
        AnalysisKind::Logs => logs_schema(),
    }
}
