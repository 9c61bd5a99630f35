use std::sync::Arc;
use std::time::Instant;

use scan_types::{AnalysisKind, AnalysisReport, AnalysisRequest, LogReport, PhishingReport};

use crate::backend::{ModelBackend, ModelCall};
use crate::config::{ModelConfig, PhishingConfig};
use crate::error::{Result, ScanError};
use crate::prompt::build_prompt;
use crate::schema::response_schema;

/// Turns one request into one model call and one validated report.
#[derive(Clone)]
pub struct Analyzer {
    backend: Arc<dyn ModelBackend>,
    model: ModelConfig,
    phishing: PhishingConfig,
}

impl Analyzer {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        model: ModelConfig,
        phishing: PhishingConfig,
    ) -> Self {
        Self {
            backend,
            model,
            phishing,
        }
    }

    pub fn model_for(&self, kind: AnalysisKind) -> &str {
        match kind {
            AnalysisKind::Phishing => &self.model.phishing_model,
            AnalysisKind::Logs => &self.model.logs_model,
        }
    }

    fn build_call(&self, request: &AnalysisRequest) -> ModelCall {
        let (thinking_budget, grounding) = match request.kind {
            AnalysisKind::Phishing => (None, self.phishing.grounding),
            AnalysisKind::Logs => (
                self.model.logs_thinking_budget.filter(|budget| *budget > 0),
                false,
            ),
        };
        ModelCall {
            model: self.model_for(request.kind).to_string(),
            prompt: build_prompt(request.kind, &request.raw_text),
            schema: response_schema(request.kind),
            thinking_budget,
            grounding,
        }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        if request.is_blank() {
            return Err(ScanError::EmptyInput);
        }
        let call = self.build_call(request);
        let model = call.model.clone();
        let started = Instant::now();
        tracing::info!(
            kind = %request.kind,
            model = %model,
            input_len = request.raw_text.len(),
            "analysis started"
        );

        let outcome = self.backend.generate(call).await.and_then(|reply| {
            let text = reply.text.ok_or(ScanError::EmptyResponse)?;
            let mut report = parse_report(request.kind, &text)?;
            if let AnalysisReport::Phishing(phishing) = &mut report {
                if !reply.sources.is_empty() {
                    phishing.grounding_sources = Some(reply.sources);
                }
            }
            Ok(report)
        });

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(report) => tracing::info!(
                kind = %request.kind,
                model = %model,
                risk = %report.risk_level(),
                elapsed_ms,
                "analysis finished"
            ),
            Err(err) => tracing::warn!(
                kind = %request.kind,
                model = %model,
                error = %err,
                elapsed_ms,
                "analysis failed"
            ),
        }
        outcome
    }
}

/// Parses model text against the canonical schema for `kind`.
pub fn parse_report(kind: AnalysisKind, text: &str) -> Result<AnalysisReport> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ScanError::EmptyResponse);
    }
    let payload = extract_json_block(trimmed).unwrap_or(trimmed);
    let report = match kind {
        AnalysisKind::Phishing => serde_json::from_str::<PhishingReport>(payload)
            .map(AnalysisReport::Phishing),
        AnalysisKind::Logs => {
            serde_json::from_str::<LogReport>(payload).map(AnalysisReport::Logs)
        }
    };
    report.map_err(|err| ScanError::Parse(err.to_string()))
}

fn extract_json_block(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let end = input.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&input[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ModelReply;
    use async_trait::async_trait;
    use scan_types::{GroundingSource, RiskLevel};
    use std::sync::Mutex;

    struct ScriptedBackend {
        replies: Mutex<Vec<Result<ModelReply>>>,
        calls: Mutex<Vec<ModelCall>>,
    }

    impl ScriptedBackend {
        fn replying(reply: Result<ModelReply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(vec![reply]),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<ModelCall> {
            self.calls.lock().expect("calls").clone()
        }
    }

    #[async_trait]
    impl ModelBackend for ScriptedBackend {
        async fn generate(&self, call: ModelCall) -> Result<ModelReply> {
            self.calls.lock().expect("calls").push(call);
            self.replies
                .lock()
                .expect("replies")
                .pop()
                .unwrap_or(Err(ScanError::EmptyResponse))
        }
    }

    fn text_reply(text: &str) -> Result<ModelReply> {
        Ok(ModelReply {
            text: Some(text.to_string()),
            sources: Vec::new(),
        })
    }

    fn analyzer(backend: Arc<ScriptedBackend>, grounding: bool) -> Analyzer {
        Analyzer::new(backend, ModelConfig::default(), PhishingConfig { grounding })
    }

    const PHISHING_JSON: &str = r#"{
        "threat_type": "Phishing",
        "risk_level": "High",
        "explanation": "Urgent tone and a shortened link.",
        "recommended_actions": ["Do not click the link", "Report the message"]
    }"#;

    #[tokio::test]
    async fn blank_input_makes_no_call() {
        let backend = ScriptedBackend::replying(text_reply(PHISHING_JSON));
        let analyzer = analyzer(Arc::clone(&backend), false);
        let err = analyzer
            .analyze(&AnalysisRequest::new(AnalysisKind::Phishing, "   \n"))
            .await
            .err()
            .expect("expected error");
        assert!(matches!(err, ScanError::EmptyInput));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn one_call_per_scan_with_kind_specific_settings() {
        let backend = ScriptedBackend::replying(text_reply(PHISHING_JSON));
        let analyzer = analyzer(Arc::clone(&backend), true);
        let report = analyzer
            .analyze(&AnalysisRequest::new(AnalysisKind::Phishing, "verify now"))
            .await
            .expect("report");
        assert_eq!(report.risk_level(), RiskLevel::High);

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gemini-3-flash-preview");
        assert!(calls[0].grounding);
        assert!(calls[0].thinking_budget.is_none());
        assert!(calls[0].prompt.contains("verify now"));
        assert_eq!(calls[0].schema, response_schema(AnalysisKind::Phishing));
    }

    #[tokio::test]
    async fn logs_use_thinking_budget_and_never_ground() {
        let logs_json = r#"{
            "suspicious_activity": true,
            "detected_patterns": ["4 failures then success"],
            "possible_attack": "Brute Force",
            "risk_level": "High",
            "explanation": "Someone guessed the admin password.",
            "recommended_actions": ["Reset the admin password"]
        }"#;
        let backend = ScriptedBackend::replying(Ok(ModelReply {
            text: Some(logs_json.to_string()),
            sources: vec![GroundingSource {
                uri: "https://example.com".to_string(),
                title: "ignored".to_string(),
            }],
        }));
        let analyzer = analyzer(Arc::clone(&backend), true);
        let report = analyzer
            .analyze(&AnalysisRequest::new(AnalysisKind::Logs, "FAILED"))
            .await
            .expect("report");
        assert!(report.sources().is_empty());
        assert_eq!(report.headline(), "Brute Force");

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gemini-3-pro-preview");
        assert_eq!(calls[0].thinking_budget, Some(16384));
        assert!(!calls[0].grounding);
    }

    #[tokio::test]
    async fn phishing_report_carries_grounding_sources() {
        let backend = ScriptedBackend::replying(Ok(ModelReply {
            text: Some(PHISHING_JSON.to_string()),
            sources: vec![GroundingSource {
                uri: "https://support.apple.com/phishing".to_string(),
                title: "Recognize phishing".to_string(),
            }],
        }));
        let report = analyzer(backend, true)
            .analyze(&AnalysisRequest::new(AnalysisKind::Phishing, "icloud locked"))
            .await
            .expect("report");
        assert_eq!(report.sources().len(), 1);
        assert_eq!(report.sources()[0].title, "Recognize phishing");
    }

    #[tokio::test]
    async fn missing_text_is_empty_response() {
        let backend = ScriptedBackend::replying(Ok(ModelReply::default()));
        let err = analyzer(backend, false)
            .analyze(&AnalysisRequest::new(AnalysisKind::Phishing, "hello"))
            .await
            .err()
            .expect("expected error");
        assert!(matches!(err, ScanError::EmptyResponse));
    }

    #[tokio::test]
    async fn upstream_errors_pass_through() {
        let backend = ScriptedBackend::replying(Err(ScanError::upstream(Some(401), "denied")));
        let err = analyzer(backend, false)
            .analyze(&AnalysisRequest::new(AnalysisKind::Logs, "GET /admin"))
            .await
            .err()
            .expect("expected error");
        assert!(matches!(err, ScanError::Upstream { status: Some(401), .. }));
    }

    #[test]
    fn parse_extracts_fenced_json() {
        let text = format!("```json\n{PHISHING_JSON}\n```");
        let report = parse_report(AnalysisKind::Phishing, &text).expect("report");
        assert_eq!(report.headline(), "Phishing");
        assert_eq!(report.actions().len(), 2);
    }

    #[test]
    fn parse_rejects_unknown_risk_level() {
        let text = PHISHING_JSON.replace("\"High\"", "\"Critical\"");
        let err = parse_report(AnalysisKind::Phishing, &text)
            .err()
            .expect("expected error");
        match err {
            ScanError::Parse(message) => assert!(message.contains("risk_level")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_malformed_and_mismatched_json() {
        assert!(matches!(
            parse_report(AnalysisKind::Phishing, "not json at all"),
            Err(ScanError::Parse(_))
        ));
        assert!(matches!(
            parse_report(AnalysisKind::Phishing, "{\"threat_type\": \"x\""),
            Err(ScanError::Parse(_))
        ));
        assert!(matches!(
            parse_report(AnalysisKind::Logs, PHISHING_JSON),
            Err(ScanError::Parse(_))
        ));
        assert!(matches!(
            parse_report(AnalysisKind::Logs, "  "),
            Err(ScanError::EmptyResponse)
        ));
    }
}
