use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use countup_core::StatTarget;

use crate::theme::Theme;

/// Stats grid: one column per target, number row above label row
pub struct StatsWidget;

impl StatsWidget {
    /// The four rows of the stats block: blank, values, labels, blank
    ///
    /// `formatted` holds the current display strings, one per target. Each
    /// number is right-aligned in a field sized by `display_width` for its
    /// final value, which always fits the grouped digits.
    pub fn lines(
        targets: &[StatTarget],
        formatted: &[String],
        width: u16,
        theme: &Theme,
    ) -> Vec<Line<'static>> {
        if targets.is_empty() {
            return vec![Line::default(); 4];
        }

        let col_width = usize::from(width) / targets.len();
        let number_style = Style::default()
            .fg(theme.number)
            .add_modifier(Modifier::BOLD);
        let suffix_style = Style::default().fg(theme.suffix);
        let label_style = Style::default().fg(theme.grey2);

        let mut values = Vec::new();
        let mut labels = Vec::new();
        for (i, target) in targets.iter().enumerate() {
            let number = formatted.get(i).map(String::as_str).unwrap_or("0");
            let field = format!("{number:>width$}", width = target.width());

            let mut cell = vec![Span::styled(field, number_style)];
            if let Some(suffix) = &target.suffix {
                cell.push(Span::styled(format!(" {suffix}"), suffix_style));
            }
            values.extend(center(cell, col_width));

            let label = truncate(&target.label, col_width.saturating_sub(2));
            labels.extend(center(vec![Span::styled(label, label_style)], col_width));
        }

        vec![
            Line::default(),
            Line::from(values),
            Line::from(labels),
            Line::default(),
        ]
    }
}

/// Pad `spans` with spaces to sit in the middle of `col_width` columns
fn center(spans: Vec<Span<'static>>, col_width: usize) -> Vec<Span<'static>> {
    let content: usize = spans.iter().map(|s| s.content.width()).sum();
    let free = col_width.saturating_sub(content);
    let left = free / 2;
    let right = free - left;

    let mut out = Vec::with_capacity(spans.len() + 2);
    out.push(Span::raw(" ".repeat(left)));
    out.extend(spans);
    out.push(Span::raw(" ".repeat(right)));
    out
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
