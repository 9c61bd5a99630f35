use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders};
use scan_types::{AnalysisKind, RiskLevel};

#[derive(Clone, Copy)]
pub(crate) enum ValueStyle {
    Normal,
    Important,
    Dim,
}

/// Traffic-light colors shared by badges, gauges and history rows.
struct RiskPalette {
    high: Color,
    medium: Color,
    low: Color,
}

impl RiskPalette {
    fn color(&self, level: RiskLevel) -> Color {
        match level {
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
        }
    }
}

pub(crate) struct Theme {
    frame: Color,
    frame_focused: Color,
    heading: Color,
    body: Color,
    muted: Color,
    brand: Color,
    selection: Color,
    risk: RiskPalette,
    phishing: Color,
    logs: Color,
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

impl Theme {
    pub(crate) fn dark() -> Self {
        Self {
            frame: Color::Rgb(71, 85, 105),
            frame_focused: Color::Rgb(129, 140, 248),
            heading: Color::Rgb(226, 232, 240),
            body: Color::Rgb(203, 213, 225),
            muted: Color::Rgb(100, 116, 139),
            brand: Color::Rgb(99, 102, 241),
            selection: Color::Rgb(30, 41, 59),
            risk: RiskPalette {
                high: Color::Rgb(239, 68, 68),
                medium: Color::Rgb(245, 158, 11),
                low: Color::Rgb(16, 185, 129),
            },
            phishing: Color::Rgb(59, 130, 246),
            logs: Color::Rgb(168, 85, 247),
        }
    }

    pub(crate) fn block<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.frame))
            .title(Span::styled(format!(" {title} "), bold(self.heading)))
    }

    pub(crate) fn focused_block<'a>(&self, title: &'a str) -> Block<'a> {
        self.block(title)
            .border_style(Style::default().fg(self.frame_focused))
    }

    pub(crate) fn highlight_style(&self) -> Style {
        bold(self.heading).bg(self.selection)
    }

    pub(crate) fn help_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub(crate) fn accent_style(&self) -> Style {
        bold(self.brand)
    }

    pub(crate) fn warn_style(&self) -> Style {
        bold(self.risk.medium)
    }

    pub(crate) fn error_style(&self) -> Style {
        bold(self.risk.high)
    }

    pub(crate) fn key_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::ITALIC)
    }

    pub(crate) fn section_style(&self) -> Style {
        bold(self.frame_focused)
    }

    pub(crate) fn value_style(&self, level: ValueStyle) -> Style {
        match level {
            ValueStyle::Normal => Style::default().fg(self.body),
            ValueStyle::Important => bold(self.heading),
            ValueStyle::Dim => Style::default().fg(self.muted),
        }
    }

    pub(crate) fn risk_style(&self, level: RiskLevel) -> Style {
        bold(self.risk.color(level))
    }

    pub(crate) fn kind_style(&self, kind: AnalysisKind) -> Style {
        match kind {
            AnalysisKind::Phishing => bold(self.phishing),
            AnalysisKind::Logs => bold(self.logs),
        }
    }

    /// Gauge fill for the share of high-risk scans.
    pub(crate) fn posture_style(&self, attention: bool) -> Style {
        if attention {
            bold(self.risk.high)
        } else {
            bold(self.risk.low)
        }
    }
}
