mod page;
mod stats;
mod status_bar;

pub use page::PageWidget;
pub use stats::StatsWidget;
pub use status_bar::StatusBarWidget;
