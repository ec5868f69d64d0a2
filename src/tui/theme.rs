//! Colors and styles for the TUI.

use crate::types::{AlertSeverity, RiskLevel};
use ratatui::style::{Color, Modifier, Style};

/// Dashboard palette. Gains, losses and risk levels share three signal colors.
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,
    pub heading: Color,
    pub gain: Color,
    pub caution: Color,
    pub loss: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            heading: Color::Magenta,
            gain: Color::Green,
            caution: Color::Yellow,
            loss: Color::Red,
            info: Color::Blue,
            muted: Color::DarkGray,
        }
    }
}

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

impl Theme {
    pub fn title(&self) -> Style {
        fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn header(&self) -> Style {
        fg(self.heading).add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        fg(self.gain)
    }

    pub fn warning(&self) -> Style {
        fg(self.caution)
    }

    pub fn error(&self) -> Style {
        fg(self.loss)
    }

    pub fn info(&self) -> Style {
        fg(self.info)
    }

    pub fn muted(&self) -> Style {
        fg(self.muted)
    }

    pub fn border(&self) -> Style {
        fg(self.accent)
    }

    pub fn tab_active(&self) -> Style {
        fg(Color::Black)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive(&self) -> Style {
        self.muted()
    }

    /// Green for gains, red for losses.
    pub fn signed(&self, value: f64) -> Style {
        if value >= 0.0 {
            self.success()
        } else {
            self.error()
        }
    }

    pub fn risk_level(&self, level: RiskLevel) -> Style {
        match level {
            RiskLevel::Low => self.success(),
            RiskLevel::Medium => self.warning(),
            RiskLevel::High => self.error().add_modifier(Modifier::BOLD),
        }
    }

    pub fn severity(&self, severity: AlertSeverity) -> Style {
        match severity {
            AlertSeverity::Info => self.info(),
            AlertSeverity::Warning => self.warning(),
            AlertSeverity::Danger => self.error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_colors_line_up() {
        let theme = Theme::default();
        assert_eq!(theme.signed(12.5), theme.risk_level(RiskLevel::Low));
        assert_eq!(theme.signed(-0.01), theme.severity(AlertSeverity::Danger));
        assert_eq!(theme.risk_level(RiskLevel::Medium), theme.severity(AlertSeverity::Warning));
    }
}
