use scan_service::ScanError;
use scan_types::{AnalysisReport, AnalysisRequest};

pub(crate) enum UiEvent {
    ScanFinished {
        request: AnalysisRequest,
        outcome: Result<AnalysisReport, ScanError>,
    },
}
