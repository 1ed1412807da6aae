//! Page layout: where each section sits in page rows
//!
//! The layout is recomputed on resize. Visibility ratios come from these
//! regions and the scroller's offset, so rendering and observation always
//! agree on where a section is.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use countup_core::config::PageConfig;
use countup_core::counter::Region;

/// Rows the stats block occupies: blank, values, labels, blank
pub const STATS_HEIGHT: u32 = 4;

/// Rows a revealed block slides up by
pub const REVEAL_SHIFT: u16 = 2;

/// Rows above and below a section body
const HEADING_ROWS: u32 = 2;

/// Minimum hero height, for very short terminals
const MIN_HERO: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub width: u16,
    pub hero: Region,
    pub about: Region,
    pub stats: Region,
    pub services: Region,
    pub contact: Region,
    /// About paragraphs wrapped to the page width, blank rows between
    pub about_lines: Vec<String>,
    pub total_height: u32,
}

impl PageLayout {
    pub fn compute(page: &PageConfig, width: u16, viewport_height: u16) -> Self {
        let text_width = usize::from(width.saturating_sub(4).max(10));

        let mut about_lines = Vec::new();
        for (i, paragraph) in page.about.iter().enumerate() {
            if i > 0 {
                about_lines.push(String::new());
            }
            about_lines.extend(wrap_text(paragraph, text_width));
        }

        let mut cursor = 0u32;
        let mut next = |height: u32| {
            let region = Region::new(cursor, height);
            cursor += height;
            region
        };

        let hero = next(u32::from(viewport_height).max(MIN_HERO));
        let about = next(HEADING_ROWS + about_lines.len() as u32 + u32::from(REVEAL_SHIFT) + 1);
        let stats = next(STATS_HEIGHT);
        let services = next(HEADING_ROWS + page.services.len() as u32 + u32::from(REVEAL_SHIFT) + 1);
        let contact = next(HEADING_ROWS + 2);

        Self {
            width,
            hero,
            about,
            stats,
            services,
            contact,
            about_lines,
            total_height: cursor,
        }
    }

    /// Largest scroll offset that still fills the viewport
    pub fn max_offset(&self, viewport_height: u16) -> u32 {
        self.total_height.saturating_sub(u32::from(viewport_height))
    }
}

/// Greedy word wrap by display width
///
/// Words wider than `width` are split across rows.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if current_width > 0 && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
            continue;
        }

        if current_width > 0 {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if current_width > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
