use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use countup_core::counter::SessionState;
use countup_core::Clock;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render<C: Clock>(frame: &mut Frame, area: Rect, app: &App<C>) {
        frame.render_widget(Paragraph::new(Self::line(app, area.width)), area);
    }

    pub fn line<C: Clock>(app: &App<C>, width: u16) -> Line<'static> {
        let theme = &app.theme;
        let status_text = match &app.status_message {
            Some(msg) => format!(" {msg}"),
            None => {
                let state = match app.counter_state() {
                    SessionState::Idle => "WAITING",
                    SessionState::Running => "RUNNING",
                    SessionState::Completed => "DONE",
                    SessionState::Disposed => "STOPPED",
                };
                let motion = if app.reduced_motion() { "reduced" } else { "full" };
                let max = app.layout.max_offset(app.viewport_height);
                let percent = if max == 0 {
                    100
                } else {
                    app.scroller.offset().min(max) * 100 / max
                };
                format!(
                    " COUNTUP | {} | frames: {} | motion: {} | {}%",
                    state, app.frames_emitted, motion, percent
                )
            }
        };

        let help_hint = " q:quit j/k:scroll g/G:top/bottom m:motion r:replay ";
        let padding_len = usize::from(width)
            .saturating_sub(status_text.width() + help_hint.width());

        Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use countup_core::{AppConfig, ManualClock};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_reports_counter_state() {
        let mut app = App::with_clock(AppConfig::default(), Theme::default(), true, ManualClock::new());
        app.resize(120, 24);
        let line = text(&StatusBarWidget::line(&app, 120));
        assert!(line.contains("WAITING"));
        assert!(line.contains("motion: reduced"));
        assert!(line.contains(" 0%"));
        assert_eq!(line.width(), 120);
    }

    #[test]
    fn test_status_message_wins() {
        let mut app = App::with_clock(AppConfig::default(), Theme::default(), false, ManualClock::new());
        app.set_status("Counters reset");
        let line = text(&StatusBarWidget::line(&app, 80));
        assert!(line.starts_with(" Counters reset"));
    }
}
