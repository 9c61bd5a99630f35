use crate::events::UiEvent;
use scan_service::{Analyzer, ScanError};
use scan_types::AnalysisRequest;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs one scan off the UI loop and reports back over `ui_tx`.
pub(crate) fn spawn_scan(
    analyzer: Option<Arc<Analyzer>>,
    request: AnalysisRequest,
    ui_tx: mpsc::Sender<UiEvent>,
) {
    tokio::spawn(async move {
        let outcome = match analyzer {
            Some(analyzer) => analyzer.analyze(&request).await,
            None => Err(ScanError::MissingApiKey),
        };
        if ui_tx
            .send(UiEvent::ScanFinished { request, outcome })
            .await
            .is_err()
        {
            tracing::warn!("ui closed before scan finished");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::app::test_support::app_in;
    use async_trait::async_trait;
    use scan_service::{ModelBackend, ModelCall, ModelConfig, ModelReply, PhishingConfig};
    use scan_types::{AnalysisKind, RiskLevel};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const REPLY: &str = r#"{"threat_type":"Smishing","risk_level":"Medium","explanation":"Parcel fee lure.","recommended_actions":["Ignore the text"]}"#;

    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ModelBackend for CountingBackend {
        async fn generate(&self, _call: ModelCall) -> scan_service::error::Result<ModelReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ModelReply {
                text: Some(REPLY.to_string()),
                sources: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn scan_without_analyzer_fails_with_missing_api_key() {
        let (ui_tx, mut ui_rx) = mpsc::channel(4);
        let request = AnalysisRequest::new(AnalysisKind::Phishing, "verify your account");
        spawn_scan(None, request.clone(), ui_tx);

        let UiEvent::ScanFinished {
            request: finished,
            outcome,
        } = ui_rx.recv().await.expect("scan event");
        assert_eq!(finished, request);
        assert!(matches!(outcome, Err(ScanError::MissingApiKey)));
        assert!(ui_rx.recv().await.is_none(), "exactly one event per scan");
    }

    #[tokio::test]
    async fn each_start_scan_makes_one_call_and_one_event() {
        let backend = Arc::new(CountingBackend::default());
        let analyzer = Arc::new(Analyzer::new(
            backend.clone(),
            ModelConfig::default(),
            PhishingConfig::default(),
        ));
        let mut app = app_in("worker-scan");
        let (ui_tx, mut ui_rx) = mpsc::channel(4);

        for (round, text) in ["your parcel is held", "pay the customs fee"]
            .into_iter()
            .enumerate()
        {
            app.input = text.to_string();
            let request = app.begin_scan().expect("scan should start");
            spawn_scan(Some(Arc::clone(&analyzer)), request, ui_tx.clone());

            let event = ui_rx.recv().await.expect("scan event");
            app.handle_event(event);
            assert!(ui_rx.try_recv().is_err(), "no second event for one scan");
            assert_eq!(backend.calls.load(Ordering::SeqCst), round + 1);
            assert_eq!(app.history.len(), round + 1);
            assert!(!app.analyzing);
            assert_eq!(
                app.result.as_ref().map(|report| report.risk_level()),
                Some(RiskLevel::Medium)
            );
        }

        drop(ui_tx);
        assert!(ui_rx.recv().await.is_none());
    }
}
