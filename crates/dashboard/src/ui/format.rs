use ratatui::text::{Line, Span, Text};
use scan_types::{AnalysisReport, HistoryItem};

use super::text::{
    display_width, one_line, pad_right, sanitize_text_for_tui, truncate_with_ellipsis,
    wrap_text_lines,
};
use super::theme::{Theme, ValueStyle};

enum SectionBody {
    Paragraph(String),
    Bullets(&'static str, Vec<String>),
}

struct Section {
    title: &'static str,
    body: SectionBody,
}

fn report_sections(report: &AnalysisReport) -> Vec<Section> {
    let mut sections = Vec::new();
    let classification = match report {
        AnalysisReport::Phishing(_) => "THREAT CLASSIFICATION",
        AnalysisReport::Logs(_) => "ANOMALY DETECTED",
    };
    sections.push(Section {
        title: classification,
        body: SectionBody::Paragraph(report.headline().to_string()),
    });
    if let AnalysisReport::Logs(logs) = report {
        let flag = if logs.suspicious_activity { "yes" } else { "no" };
        sections.push(Section {
            title: "SUSPICIOUS ACTIVITY",
            body: SectionBody::Paragraph(flag.to_string()),
        });
        if !logs.detected_patterns.is_empty() {
            sections.push(Section {
                title: "DETECTED PATTERNS",
                body: SectionBody::Bullets("-", logs.detected_patterns.clone()),
            });
        }
    }
    sections.push(Section {
        title: "ANALYSIS SUMMARY",
        body: SectionBody::Paragraph(report.explanation().to_string()),
    });
    sections.push(Section {
        title: "RECOMMENDED ACTIONS",
        body: SectionBody::Bullets(">", report.actions().to_vec()),
    });
    let sources = report.sources();
    if !sources.is_empty() {
        let entries = sources
            .iter()
            .map(|source| {
                if source.display_title() == source.uri {
                    source.uri.clone()
                } else {
                    format!("{} ({})", source.display_title(), source.uri)
                }
            })
            .collect();
        sections.push(Section {
            title: "INTEL SOURCES",
            body: SectionBody::Bullets("*", entries),
        });
    }
    sections
}

pub(crate) fn format_report(theme: &Theme, report: &AnalysisReport, width: u16) -> Text<'static> {
    let width = width.max(1) as usize;
    let level = report.risk_level();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("● ", theme.risk_style(level)),
            Span::styled(level.label(), theme.risk_style(level)),
        ]),
        Line::default(),
    ];
    for section in report_sections(report) {
        lines.push(Line::styled(
            format!("[ {} ]", section.title),
            theme.section_style(),
        ));
        match section.body {
            SectionBody::Paragraph(text) => {
                for segment in wrap_text_lines(&sanitize_text_for_tui(&text), width) {
                    lines.push(Line::styled(segment, theme.value_style(ValueStyle::Normal)));
                }
            }
            SectionBody::Bullets(marker, items) => {
                if items.is_empty() {
                    lines.push(Line::styled("(none)", theme.value_style(ValueStyle::Dim)));
                }
                lines.extend(bullet_lines(theme, marker, &items, width));
            }
        }
        lines.push(Line::default());
    }
    Text::from(lines)
}

fn bullet_lines(
    theme: &Theme,
    marker: &'static str,
    items: &[String],
    width: usize,
) -> Vec<Line<'static>> {
    let label = format!("{marker} ");
    let indent = " ".repeat(display_width(&label));
    let body_width = width.saturating_sub(display_width(&label)).max(1);
    let mut lines = Vec::new();
    for item in items {
        let wrapped = wrap_text_lines(&sanitize_text_for_tui(item), body_width);
        for (idx, segment) in wrapped.into_iter().enumerate() {
            let prefix = if idx == 0 { label.clone() } else { indent.clone() };
            lines.push(Line::from(vec![
                Span::styled(prefix, theme.accent_style()),
                Span::styled(segment, theme.value_style(ValueStyle::Important)),
            ]));
        }
    }
    lines
}

/// Unstyled rendering shared by the fullscreen view and the `scan` command.
pub(crate) fn report_plain_text(report: &AnalysisReport) -> String {
    let mut out = format!(
        "{} report: {}\n\n",
        report.kind().label(),
        report.risk_level().label()
    );
    for section in report_sections(report) {
        out.push_str(&format!("[ {} ]\n", section.title));
        match section.body {
            SectionBody::Paragraph(text) => {
                out.push_str(&sanitize_text_for_tui(&text));
                out.push('\n');
            }
            SectionBody::Bullets(marker, items) => {
                if items.is_empty() {
                    out.push_str("(none)\n");
                }
                for item in items {
                    out.push_str(&format!("{marker} {}\n", sanitize_text_for_tui(&item)));
                }
            }
        }
        out.push('\n');
    }
    out.truncate(out.trim_end().len());
    out
}

/// `2025-01-31T08:15:00Z` -> `2025-01-31 08:15:00`.
pub(crate) fn format_timestamp(timestamp: &str) -> String {
    timestamp
        .trim_end_matches('Z')
        .replacen('T', " ", 1)
}

const KIND_COLUMN: usize = 10;
const RISK_COLUMN: usize = 8;

pub(crate) fn history_row(theme: &Theme, item: &HistoryItem, width: usize) -> Line<'static> {
    let kind = pad_right(item.kind.as_str(), KIND_COLUMN);
    let level = item.result.risk_level();
    let risk = pad_right(level.as_str(), RISK_COLUMN);
    let time = format_timestamp(&item.timestamp);
    let fixed = KIND_COLUMN + RISK_COLUMN + display_width(&time) + 2;
    let summary_width = width.saturating_sub(fixed);
    let summary = truncate_with_ellipsis(&one_line(&item.input), summary_width);
    Line::from(vec![
        Span::styled(kind, theme.kind_style(item.kind)),
        Span::styled(risk, theme.risk_style(level)),
        Span::styled(
            pad_right(&summary, summary_width),
            theme.value_style(ValueStyle::Normal),
        ),
        Span::styled(format!("  {time}"), theme.value_style(ValueStyle::Dim)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_types::{AnalysisKind, GroundingSource, LogReport, PhishingReport, RiskLevel};

    fn phishing() -> AnalysisReport {
        AnalysisReport::Phishing(PhishingReport {
            threat_type: "Phishing".to_string(),
            risk_level: RiskLevel::High,
            explanation: "Fake Apple lock notice.".to_string(),
            recommended_actions: vec![
                "Do not click the link".to_string(),
                "Report the message".to_string(),
            ],
            grounding_sources: Some(vec![GroundingSource {
                uri: "https://support.apple.com/102568".to_string(),
                title: "Recognize scams".to_string(),
            }]),
        })
    }

    fn logs() -> AnalysisReport {
        AnalysisReport::Logs(LogReport {
            suspicious_activity: true,
            detected_patterns: vec!["4 failed logins then success".to_string()],
            possible_attack: "Brute Force".to_string(),
            risk_level: RiskLevel::Medium,
            explanation: "Password guessing succeeded.".to_string(),
            recommended_actions: Vec::new(),
        })
    }

    fn text_of(text: &Text<'_>) -> String {
        text.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn phishing_report_lists_actions_and_sources() {
        let plain = report_plain_text(&phishing());
        assert!(plain.starts_with("Phishing & Scam report: High Risk"));
        assert!(plain.contains("[ THREAT CLASSIFICATION ]\nPhishing"));
        assert!(plain.contains("> Do not click the link\n> Report the message"));
        assert!(plain.contains("* Recognize scams (https://support.apple.com/102568)"));
        assert!(!plain.contains("DETECTED PATTERNS"));
    }

    #[test]
    fn log_report_shows_patterns_and_flag() {
        let plain = report_plain_text(&logs());
        assert!(plain.contains("[ ANOMALY DETECTED ]\nBrute Force"));
        assert!(plain.contains("[ SUSPICIOUS ACTIVITY ]\nyes"));
        assert!(plain.contains("- 4 failed logins then success"));
        assert!(plain.contains("[ RECOMMENDED ACTIONS ]\n(none)"));
        assert!(!plain.contains("INTEL SOURCES"));
    }

    #[test]
    fn styled_report_wraps_bullets_with_indent() {
        let rendered = text_of(&format_report(&Theme::dark(), &phishing(), 14));
        assert!(rendered.starts_with("● High Risk"));
        assert!(rendered.contains("> Do not click\n  the link"));
    }

    #[test]
    fn timestamps_read_as_local_style() {
        assert_eq!(format_timestamp("2025-01-31T08:15:00Z"), "2025-01-31 08:15:00");
    }

    #[test]
    fn history_row_truncates_summary() {
        let item = HistoryItem {
            id: "1".to_string(),
            timestamp: "2025-01-31T08:15:00Z".to_string(),
            kind: AnalysisKind::Phishing,
            input: "Subject: URGENT\nYour Apple Account has been locked".to_string(),
            result: phishing(),
        };
        let line = history_row(&Theme::dark(), &item, 60);
        let rendered: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        assert!(rendered.starts_with("phishing  High    Subject: URGENT"));
        assert!(rendered.contains("..."));
        assert!(rendered.ends_with("2025-01-31 08:15:00"));
        assert_eq!(display_width(&rendered), 60);
    }
}
