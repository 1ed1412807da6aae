pub mod config;
pub mod format;
pub mod run;
pub mod simulate;
pub mod steps;
