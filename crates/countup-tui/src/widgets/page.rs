use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};

use countup_core::reveal::offset_rows;
use countup_core::Clock;

use crate::app::App;
use crate::page::REVEAL_SHIFT;
use crate::theme::{blend, Theme};
use crate::widgets::StatsWidget;

/// The whole scrollable page
pub struct PageWidget;

impl PageWidget {
    pub fn render<C: Clock>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let lines = Self::lines(app);
        let offset = u16::try_from(app.scroller.offset()).unwrap_or(u16::MAX);

        let paragraph = Paragraph::new(Text::from(lines))
            .style(Style::default().bg(app.theme.bg0))
            .scroll((offset, 0));
        frame.render_widget(paragraph, area);
    }

    /// Page content, one entry per layout row
    pub fn lines<C: Clock>(app: &App<C>) -> Vec<Line<'static>> {
        let theme = &app.theme;
        let layout = &app.layout;
        let page = &app.config.page;
        let now = app.now();

        let mut lines = Vec::with_capacity(layout.total_height as usize);

        // Hero fills the first screen
        let hero_rows = layout.hero.height as usize;
        let title_row = (hero_rows / 2).saturating_sub(1);
        for row in 0..hero_rows {
            let line = if row == title_row {
                Line::from(Span::styled(
                    page.title.clone(),
                    Style::default()
                        .fg(theme.fg1)
                        .add_modifier(Modifier::BOLD),
                ))
            } else if row == title_row + 1 {
                Line::from(Span::styled(page.tagline.clone(), Style::default().fg(theme.grey2)))
            } else if row + 1 == hero_rows {
                Line::from(Span::styled("↓ j/k to scroll", Style::default().fg(theme.grey0)))
            } else {
                Line::default()
            };
            lines.push(line.centered());
        }

        revealed_section(
            &mut lines,
            "About",
            &layout.about_lines,
            app.about.progress(now),
            theme,
        );

        lines.extend(StatsWidget::lines(
            app.counters.targets(),
            &app.counters.formatted(),
            layout.width,
            theme,
        ));

        let services: Vec<String> = page.services.iter().map(|s| format!("• {s}")).collect();
        revealed_section(&mut lines, "Services", &services, app.services.progress(now), theme);

        lines.push(heading("Contact", theme));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("  {}", page.contact),
            Style::default().fg(theme.aqua),
        )));
        lines.push(Line::default());

        lines
    }
}

fn heading(title: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.heading)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Heading, then a body that fades in and slides up as `progress` goes to 1
///
/// Always emits `2 + body.len() + REVEAL_SHIFT + 1` rows.
fn revealed_section(
    lines: &mut Vec<Line<'static>>,
    title: &str,
    body: &[String],
    progress: f64,
    theme: &Theme,
) {
    lines.push(heading(title, theme));
    lines.push(Line::default());

    let shift = offset_rows(progress, REVEAL_SHIFT);
    let color = blend(theme.bg0, theme.fg0, progress);

    lines.extend((0..shift).map(|_| Line::default()));
    for text in body {
        lines.push(Line::from(Span::styled(format!("  {text}"), Style::default().fg(color))));
    }
    lines.extend((0..REVEAL_SHIFT - shift + 1).map(|_| Line::default()));
}
