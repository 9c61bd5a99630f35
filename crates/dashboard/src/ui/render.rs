use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Clear, Gauge, List, ListItem, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use scan_types::{AnalysisKind, Posture};

use super::app::{AppState, Tab, ViewMode};
use super::format::{format_report, history_row, report_plain_text};
use super::text::{sanitize_text_for_tui, wrap_text_lines};
use super::theme::{Theme, ValueStyle};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const RECENT_SCANS: usize = 5;

pub(crate) fn draw_ui(frame: &mut Frame, app: &mut AppState) {
    if app.view_mode == ViewMode::ReportFullscreen {
        draw_report_fullscreen(frame, app);
        return;
    }

    let theme = Theme::dark();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let titles = Tab::ALL.iter().map(|tab| tab.title()).collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .block(theme.block("ThreatLens"))
        .style(theme.value_style(ValueStyle::Dim))
        .highlight_style(theme.accent_style())
        .select(app.tab.index());
    frame.render_widget(tabs, chunks[0]);

    match app.tab {
        Tab::Dashboard => draw_dashboard(frame, app, &theme, chunks[1]),
        Tab::Phishing | Tab::Logs => draw_scan_tab(frame, app, &theme, chunks[1]),
        Tab::History => draw_history(frame, app, &theme, chunks[1]),
        Tab::HowItWorks => draw_how_it_works(frame, app, &theme, chunks[1]),
    }

    draw_footer(frame, app, &theme, chunks[2]);
}

fn draw_dashboard(frame: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    let stats = app.history.stats();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);
    let card_values = [
        ("Total Scans", stats.total),
        ("High Threats", stats.high_risk),
        ("Phish Detected", stats.phishing),
        ("Log Anomalies", stats.logs),
    ];
    for (area, (label, value)) in cards.iter().zip(card_values) {
        let card = Paragraph::new(Line::styled(
            value.to_string(),
            theme.value_style(ValueStyle::Important),
        ))
        .block(theme.block(label));
        frame.render_widget(card, *area);
    }

    let percent = stats.high_risk_percent().min(100);
    let posture = stats.posture();
    let gauge = Gauge::default()
        .block(theme.block("High-risk share"))
        .gauge_style(theme.posture_style(posture == Posture::AttentionRequired))
        .percent(percent as u16)
        .label(format!("{percent}%  {}", posture.label()));
    frame.render_widget(gauge, rows[1]);

    let block = theme.block("Recent scans");
    let width = block.inner(rows[2]).width as usize;
    let items = if app.history.is_empty() {
        vec![ListItem::new(Line::styled(
            "no scans yet: open Phishing & Scam or Log Analyzer to start",
            theme.value_style(ValueStyle::Dim),
        ))]
    } else {
        app.history
            .newest_first()
            .take(RECENT_SCANS)
            .map(|item| ListItem::new(history_row(theme, item, width)))
            .collect()
    };
    frame.render_widget(List::new(items).block(block), rows[2]);
}

fn draw_scan_tab(frame: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let kind = app.tab.kind().unwrap_or(AnalysisKind::Phishing);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let input_title = match kind {
        AnalysisKind::Phishing => "Paste your message/email/URL below",
        AnalysisKind::Logs => "Paste your security logs below",
    };
    let input_block = theme.focused_block(input_title);
    let inner = input_block.inner(body[0]);
    let input_text = if app.input.is_empty() {
        let placeholder = match kind {
            AnalysisKind::Phishing => {
                "Paste the text of the suspicious email or message here...\n\nCtrl+L loads sample data."
            }
            AnalysisKind::Logs => {
                "Paste raw logs here for anomaly detection...\n\nCtrl+L loads sample data."
            }
        };
        Text::styled(placeholder, theme.value_style(ValueStyle::Dim))
    } else {
        let wrapped = wrap_text_lines(
            &sanitize_text_for_tui(&app.input),
            inner.width.max(1) as usize,
        );
        // Keep the cursor end of long input visible.
        let overflow = wrapped.len().saturating_sub(inner.height.max(1) as usize);
        let style = theme.value_style(ValueStyle::Normal);
        Text::from(
            wrapped
                .into_iter()
                .skip(overflow)
                .map(|segment| Line::styled(segment, style))
                .collect::<Vec<_>>(),
        )
    };
    frame.render_widget(Paragraph::new(input_text).block(input_block), body[0]);

    let output_block = theme.block("Report");
    let output_inner = output_block.inner(body[1]);
    let output = if app.analyzing {
        let spinner = SPINNER[app.ticks / 2 % SPINNER.len()];
        Text::from(vec![
            Line::styled(format!("{spinner} Analyzing..."), theme.accent_style()),
            Line::default(),
            Line::styled(
                format!("Waiting for {} to reason about the input.", model_name(app, kind)),
                theme.value_style(ValueStyle::Dim),
            ),
        ])
    } else if let Some(error) = &app.error {
        let mut lines = vec![
            Line::styled("Analysis Failed", theme.error_style()),
            Line::default(),
        ];
        for segment in wrap_text_lines(error, output_inner.width.max(1) as usize) {
            lines.push(Line::styled(segment, theme.value_style(ValueStyle::Normal)));
        }
        lines.push(Line::default());
        lines.push(Line::styled("Ctrl+S to try again", theme.help_style()));
        Text::from(lines)
    } else if let Some(report) = &app.result {
        let mut text = format_report(theme, report, output_inner.width);
        if let Some(notice) = &app.notice {
            text.lines.push(Line::styled(notice.clone(), theme.warn_style()));
        }
        text
    } else {
        Text::from(vec![
            Line::styled("No scan results yet", theme.value_style(ValueStyle::Important)),
            Line::styled(
                "Enter content on the left, then press Ctrl+S to start the scan.",
                theme.value_style(ValueStyle::Dim),
            ),
        ])
    };
    let output_widget = Paragraph::new(output)
        .block(output_block)
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, body[1]);
    frame.render_widget(output_widget, body[1]);
}

fn model_name(app: &AppState, kind: AnalysisKind) -> &str {
    match kind {
        AnalysisKind::Phishing => &app.about.phishing_model,
        AnalysisKind::Logs => &app.about.logs_model,
    }
}

fn draw_history(frame: &mut Frame, app: &mut AppState, theme: &Theme, area: Rect) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let title = format!("Analysis History ({} records)", app.history.len());
    let list_block = theme.block(&title);
    let width = list_block.inner(body[0]).width.saturating_sub(3) as usize;
    let items = if app.history.is_empty() {
        vec![ListItem::new(Line::styled(
            "No analysis logs yet. Analyze a message or some logs to populate history.",
            theme.value_style(ValueStyle::Dim),
        ))]
    } else {
        app.history
            .newest_first()
            .map(|item| ListItem::new(history_row(theme, item, width)))
            .collect()
    };
    let list = List::new(items)
        .block(list_block)
        .highlight_style(theme.highlight_style())
        .highlight_symbol(">> ");
    frame.render_stateful_widget(list, body[0], &mut app.history_list_state);

    let detail_block = theme.block("Details");
    let detail_inner = detail_block.inner(body[1]);
    let details = app
        .selected_history()
        .map(|item| format_report(theme, &item.result, detail_inner.width))
        .unwrap_or_else(|| Text::from("no history selected"));
    frame.render_widget(Clear, body[1]);
    frame.render_widget(
        Paragraph::new(details)
            .block(detail_block)
            .wrap(Wrap { trim: false }),
        body[1],
    );
}

fn draw_how_it_works(frame: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let steps = [
        ("CAPTURE", "Paste or type a message, URL or raw logs into the scan tab."),
        ("PROMPT", "The text is wrapped in an analyst prompt for its kind."),
        ("REASON", "The model answers under a strict JSON response schema."),
        ("REPORT", "Risk level, explanation and actions are validated, shown and saved."),
    ];
    let mut lines = Vec::new();
    for (index, (title, desc)) in steps.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}. {title}  ", index + 1), theme.section_style()),
            Span::styled(*desc, theme.value_style(ValueStyle::Normal)),
        ]));
    }
    lines.push(Line::default());
    let facts = [
        ("phishing model", app.about.phishing_model.clone()),
        ("logs model", app.about.logs_model.clone()),
        ("history file", app.about.history_path.clone()),
        (
            "api key",
            if app.about.api_key_configured {
                "configured".to_string()
            } else {
                "missing (set API_KEY or GEMINI_API_KEY)".to_string()
            },
        ),
    ];
    for (key, value) in facts {
        lines.push(Line::from(vec![
            Span::styled(format!("{key}: "), theme.key_style()),
            Span::styled(value, theme.value_style(ValueStyle::Important)),
        ]));
    }
    let widget = Paragraph::new(lines)
        .block(theme.block("How it works"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn draw_footer(frame: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let help = match app.tab {
        Tab::Phishing | Tab::Logs => {
            "Ctrl+S=start scan  Ctrl+L=sample  Ctrl+U=clear  Ctrl+R=full report  Tab=next tab  Ctrl+C=quit  "
        }
        Tab::History => "j/k=select  Enter=open  Tab=next tab  Q=quit  ",
        Tab::Dashboard | Tab::HowItWorks => "Tab/Shift+Tab=switch tab  Q=quit  ",
    };
    let mut spans = vec![Span::styled(help, theme.help_style())];
    if app.confirm_quit {
        spans.push(Span::styled("press Q again to quit / Esc to cancel  ", theme.warn_style()));
    }
    let footer = Paragraph::new(Line::from(spans)).block(theme.block("Controls"));
    frame.render_widget(footer, area);
}

fn draw_report_fullscreen(frame: &mut Frame, app: &mut AppState) {
    let theme = Theme::dark();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(frame.area());

    let report_text = app
        .result
        .as_ref()
        .map(report_plain_text)
        .unwrap_or_else(|| "no report".to_string());

    let block = theme.block("Report (fullscreen)");
    let inner = block.inner(chunks[0]);
    let wrapped = wrap_text_lines(&report_text, inner.width.max(1) as usize);
    app.set_report_metrics(wrapped.len(), inner.height);

    let panel = Paragraph::new(wrapped.join("\n"))
        .block(block)
        .style(theme.value_style(ValueStyle::Normal))
        .scroll((app.report_scroll as u16, 0));
    frame.render_widget(panel, chunks[0]);

    let mut spans = vec![Span::styled(
        "j/k=scroll  gg/G=top/bottom  Ctrl+f/b=page  Esc=back  Q=quit  ",
        theme.help_style(),
    )];
    if app.confirm_quit {
        spans.push(Span::styled("press Q again to quit / Esc to cancel  ", theme.warn_style()));
    }
    spans.push(Span::styled(
        format!(
            "line {}/{}",
            app.report_scroll.saturating_add(1),
            app.report_total_lines
        ),
        theme.accent_style(),
    ));
    let footer = Paragraph::new(Line::from(spans)).block(theme.block("Controls"));
    frame.render_widget(footer, chunks[1]);
}
