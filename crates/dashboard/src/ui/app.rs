use crate::events::UiEvent;
use ratatui::widgets::ListState;
use scan_service::{sample_input, HistoryStore};
use scan_types::{AnalysisKind, AnalysisReport, AnalysisRequest, HistoryItem};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Tab {
    Dashboard,
    #[default]
    Phishing,
    Logs,
    History,
    HowItWorks,
}

impl Tab {
    pub(crate) const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Phishing,
        Tab::Logs,
        Tab::History,
        Tab::HowItWorks,
    ];

    pub(crate) fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Phishing => "Phishing & Scam",
            Tab::Logs => "Log Analyzer",
            Tab::History => "History",
            Tab::HowItWorks => "How it works",
        }
    }

    pub(crate) fn index(&self) -> usize {
        Tab::ALL.iter().position(|tab| tab == self).unwrap_or(0)
    }

    pub(crate) fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub(crate) fn prev(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// Tabs that take input and run scans.
    pub(crate) fn kind(&self) -> Option<AnalysisKind> {
        match self {
            Tab::Phishing => Some(AnalysisKind::Phishing),
            Tab::Logs => Some(AnalysisKind::Logs),
            _ => None,
        }
    }

    pub(crate) fn for_kind(kind: AnalysisKind) -> Tab {
        match kind {
            AnalysisKind::Phishing => Tab::Phishing,
            AnalysisKind::Logs => Tab::Logs,
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ViewMode {
    #[default]
    Normal,
    ReportFullscreen,
}

/// Static facts shown on the "How it works" tab.
#[derive(Clone, Debug, Default)]
pub(crate) struct AboutInfo {
    pub(crate) phishing_model: String,
    pub(crate) logs_model: String,
    pub(crate) history_path: String,
    pub(crate) api_key_configured: bool,
}

pub(crate) struct AppState {
    pub(crate) tab: Tab,
    pub(crate) input: String,
    pub(crate) analyzing: bool,
    pub(crate) result: Option<AnalysisReport>,
    pub(crate) error: Option<String>,
    pub(crate) notice: Option<String>,
    pub(crate) history: HistoryStore,
    pub(crate) history_selected: usize,
    pub(crate) history_list_state: ListState,
    pub(crate) about: AboutInfo,
    pub(crate) view_mode: ViewMode,
    pub(crate) report_scroll: usize,
    pub(crate) report_max_scroll: usize,
    pub(crate) report_total_lines: usize,
    pub(crate) report_view_height: u16,
    pub(crate) pending_g: bool,
    pub(crate) confirm_quit: bool,
    pub(crate) ticks: usize,
}

impl AppState {
    pub(crate) fn new(history: HistoryStore, about: AboutInfo) -> Self {
        let mut app = Self {
            tab: Tab::default(),
            input: String::new(),
            analyzing: false,
            result: None,
            error: None,
            notice: None,
            history,
            history_selected: 0,
            history_list_state: ListState::default(),
            about,
            view_mode: ViewMode::default(),
            report_scroll: 0,
            report_max_scroll: 0,
            report_total_lines: 0,
            report_view_height: 0,
            pending_g: false,
            confirm_quit: false,
            ticks: 0,
        };
        app.sync_history_selection();
        app
    }

    pub(crate) fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub(crate) fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ScanFinished { request, outcome } => {
                self.analyzing = false;
                match outcome {
                    Ok(report) => {
                        if let Err(err) =
                            self.history
                                .append(request.kind, &request.raw_text, report.clone())
                        {
                            tracing::error!(error = %err, "failed to save history");
                            self.notice = Some(format!("report not saved: {err}"));
                        }
                        self.history_selected = 0;
                        self.sync_history_selection();
                        self.result = Some(report);
                        self.error = None;
                        self.report_scroll = 0;
                    }
                    Err(err) => {
                        self.result = None;
                        self.error = Some(err.to_string());
                    }
                }
            }
        }
    }

    /// Switching tabs starts from a clean slate. Blocked while a scan runs.
    pub(crate) fn set_tab(&mut self, tab: Tab) {
        if self.analyzing || tab == self.tab {
            return;
        }
        self.tab = tab;
        self.input.clear();
        self.result = None;
        self.error = None;
        self.notice = None;
        self.confirm_quit = false;
        self.view_mode = ViewMode::Normal;
    }

    pub(crate) fn can_scan(&self) -> bool {
        !self.analyzing && self.tab.kind().is_some() && !self.input.trim().is_empty()
    }

    /// Returns the request to run, or `None` when a scan cannot start.
    pub(crate) fn begin_scan(&mut self) -> Option<AnalysisRequest> {
        if !self.can_scan() {
            return None;
        }
        let kind = self.tab.kind()?;
        self.analyzing = true;
        self.result = None;
        self.error = None;
        self.notice = None;
        self.view_mode = ViewMode::Normal;
        Some(AnalysisRequest::new(kind, self.input.clone()))
    }

    pub(crate) fn load_sample(&mut self) {
        if let Some(kind) = self.tab.kind() {
            self.input = sample_input(kind).to_string();
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        if self.tab.kind().is_some() {
            self.input.push(ch);
        }
    }

    pub(crate) fn paste(&mut self, text: &str) {
        if self.tab.kind().is_none() {
            return;
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.input.push_str(&normalized);
    }

    pub(crate) fn backspace(&mut self) {
        self.input.pop();
    }

    pub(crate) fn clear_input(&mut self) {
        self.input.clear();
    }

    pub(crate) fn select_next(&mut self) {
        if self.history.is_empty() {
            return;
        }
        self.history_selected = (self.history_selected + 1) % self.history.len();
        self.sync_history_selection();
    }

    pub(crate) fn select_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        if self.history_selected == 0 {
            self.history_selected = self.history.len() - 1;
        } else {
            self.history_selected -= 1;
        }
        self.sync_history_selection();
    }

    /// History rows are shown newest first; `history_selected` indexes that order.
    pub(crate) fn selected_history(&self) -> Option<&HistoryItem> {
        self.history.newest_first().nth(self.history_selected)
    }

    pub(crate) fn open_selected_history(&mut self) {
        let Some(item) = self.selected_history().cloned() else {
            return;
        };
        self.set_tab(Tab::for_kind(item.kind));
        self.input = item.input;
        self.result = Some(item.result);
        self.error = None;
        self.report_scroll = 0;
    }

    pub(crate) fn enter_report_fullscreen(&mut self) {
        if self.result.is_none() {
            return;
        }
        self.view_mode = ViewMode::ReportFullscreen;
        self.report_scroll = 0;
        self.pending_g = false;
        self.confirm_quit = false;
    }

    pub(crate) fn exit_report_fullscreen(&mut self) {
        self.view_mode = ViewMode::Normal;
        self.pending_g = false;
    }

    pub(crate) fn set_report_metrics(&mut self, total_lines: usize, view_height: u16) {
        let total_lines = total_lines.max(1);
        self.report_total_lines = total_lines;
        self.report_view_height = view_height;
        self.report_max_scroll = total_lines.saturating_sub(view_height as usize);
        if self.report_scroll > self.report_max_scroll {
            self.report_scroll = self.report_max_scroll;
        }
    }

    pub(crate) fn scroll_down(&mut self, lines: usize) {
        self.report_scroll = (self.report_scroll + lines).min(self.report_max_scroll);
        self.pending_g = false;
    }

    pub(crate) fn scroll_up(&mut self, lines: usize) {
        self.report_scroll = self.report_scroll.saturating_sub(lines);
        self.pending_g = false;
    }

    pub(crate) fn scroll_to_top(&mut self) {
        self.report_scroll = 0;
        self.pending_g = false;
    }

    pub(crate) fn scroll_to_bottom(&mut self) {
        self.report_scroll = self.report_max_scroll;
        self.pending_g = false;
    }

    pub(crate) fn page_size(&self) -> usize {
        let height = self.report_view_height.max(1) as usize;
        height.saturating_sub(1).max(1)
    }

    pub(crate) fn half_page_size(&self) -> usize {
        let height = self.report_view_height.max(1) as usize;
        (height / 2).max(1)
    }

    fn sync_history_selection(&mut self) {
        if self.history.is_empty() {
            self.history_selected = 0;
            self.history_list_state.select(None);
        } else {
            self.history_selected = self.history_selected.min(self.history.len() - 1);
            self.history_list_state.select(Some(self.history_selected));
        }
    }
}
