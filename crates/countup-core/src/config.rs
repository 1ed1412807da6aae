use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::counter::{resolve_desired_steps, StatTarget, StepPolicy, DEFAULT_DESIRED_STEPS};
use crate::easing::EasingType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub page: PageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Tuning for the counter animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Total animation time; 0 completes immediately
    #[serde(default = "default_counter_duration")]
    pub duration_ms: u64,
    /// Tick rate cap for value updates
    #[serde(default = "default_counter_fps")]
    pub fps: u32,
    /// Visible value changes per counter (0 = derive from duration and fps)
    #[serde(default = "default_desired_steps")]
    pub desired_steps: u32,
    #[serde(default)]
    pub step_policy: StepPolicy,
    #[serde(default)]
    pub easing: EasingType,
    /// Visible fraction of the stats block that starts the animation
    #[serde(default = "default_counter_threshold")]
    pub visibility_threshold: f64,
    /// Force reduced motion on or off (unset = ask the host)
    #[serde(default)]
    pub reduced_motion: Option<bool>,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_counter_duration(),
            fps: default_counter_fps(),
            desired_steps: default_desired_steps(),
            step_policy: StepPolicy::default(),
            easing: EasingType::default(),
            visibility_threshold: default_counter_threshold(),
            reduced_motion: None,
        }
    }
}

impl CounterConfig {
    /// Minimum gap between accepted ticks
    const MIN_TICK_MS: u64 = 16;

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Interval between accepted ticks: `max(16ms, 1000/fps)`
    pub fn tick_interval(&self) -> Duration {
        let fps = if self.fps == 0 {
            default_counter_fps()
        } else {
            self.fps
        };
        let ms = (1000.0 / f64::from(fps)).round() as u64;
        Duration::from_millis(ms.max(Self::MIN_TICK_MS))
    }

    /// Effective step budget
    pub fn step_budget(&self) -> u32 {
        resolve_desired_steps(self.desired_steps, self.duration(), self.fps.max(1))
    }

    /// Quantization step for one target
    pub fn step_for(&self, target: u64) -> u64 {
        self.step_policy.step_for(target, self.step_budget())
    }
}

/// Tuning for scroll-reveal transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f64,
    /// Fraction of the viewport height cut off at the bottom
    #[serde(default = "default_reveal_bottom_margin")]
    pub bottom_margin: f64,
    #[serde(default = "default_reveal_text_duration")]
    pub text_duration_ms: u64,
    #[serde(default = "default_reveal_text_delay")]
    pub text_delay_ms: u64,
    #[serde(default = "default_reveal_media_duration")]
    pub media_duration_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_reveal_threshold(),
            bottom_margin: default_reveal_bottom_margin(),
            text_duration_ms: default_reveal_text_duration(),
            text_delay_ms: default_reveal_text_delay(),
            media_duration_ms: default_reveal_media_duration(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while something is animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            scroll: ScrollConfig::default(),
        }
    }
}

/// Smooth page scrolling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Rows moved per j/k press
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
        }
    }
}

/// Stat value as written in config: a bare number or display text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatConfig {
    pub value: StatValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub label: String,
}

impl StatConfig {
    fn number(value: f64, suffix: &str, label: &str) -> Self {
        Self {
            value: StatValue::Number(value),
            suffix: Some(suffix.to_string()),
            label: label.to_string(),
        }
    }

    /// Resolve into a counter target; an explicit suffix wins over parsed text
    pub fn to_target(&self) -> StatTarget {
        match &self.value {
            StatValue::Number(n) => StatTarget::from_f64(*n, self.suffix.clone(), &self.label),
            StatValue::Text(text) => {
                let parsed = StatTarget::parse(text, &self.label);
                match &self.suffix {
                    Some(suffix) => StatTarget::new(parsed.target, Some(suffix.clone()), &self.label),
                    None => parsed,
                }
            }
        }
    }
}

/// Content of the terminal page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_tagline")]
    pub tagline: String,
    #[serde(default = "default_about")]
    pub about: Vec<String>,
    #[serde(default = "default_stats")]
    pub stats: Vec<StatConfig>,
    #[serde(default = "default_services")]
    pub services: Vec<String>,
    #[serde(default = "default_contact")]
    pub contact: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            tagline: default_tagline(),
            about: default_about(),
            stats: default_stats(),
            services: default_services(),
            contact: default_contact(),
        }
    }
}

impl PageConfig {
    pub fn stat_targets(&self) -> Vec<StatTarget> {
        self.stats.iter().map(StatConfig::to_target).collect()
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("countup")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_counter_duration() -> u64 {
    3000
}

fn default_counter_fps() -> u32 {
    30
}

fn default_desired_steps() -> u32 {
    DEFAULT_DESIRED_STEPS
}

fn default_counter_threshold() -> f64 {
    0.35
}

fn default_reveal_threshold() -> f64 {
    0.2
}

fn default_reveal_bottom_margin() -> f64 {
    0.1
}

fn default_reveal_text_duration() -> u64 {
    1700
}

fn default_reveal_text_delay() -> u64 {
    80
}

fn default_reveal_media_duration() -> u64 {
    1900
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_scroll_duration() -> u64 {
    150
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_title() -> String {
    "Steelframe Engineering".to_string()
}

fn default_tagline() -> String {
    "Reinforcement design, detailing and site supervision".to_string()
}

fn default_about() -> Vec<String> {
    vec![
        "We are a structural engineering office working on residential, commercial and infrastructure projects across Europe.".to_string(),
        "Our teams prepare reinforcement drawings, bending schedules and quantity take-offs, and stay on site until the last pour.".to_string(),
        "Every project is checked twice: once on paper and once in concrete.".to_string(),
    ]
}

fn default_stats() -> Vec<StatConfig> {
    vec![
        StatConfig::number(120.0, "+", "Completed projects"),
        StatConfig::number(150_000.0, "m²", "Reinforcement area detailed"),
        StatConfig::number(10.0, "+", "Long-term clients"),
    ]
}

fn default_services() -> Vec<String> {
    vec![
        "Reinforcement detailing".to_string(),
        "Bar bending schedules".to_string(),
        "Structural design review".to_string(),
        "Site supervision".to_string(),
        "BIM coordination".to_string(),
    ]
}

fn default_contact() -> String {
    "office@steelframe.example".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if missing
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no animation can run with
    pub fn validate(&self) -> crate::Result<()> {
        let check_fraction = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(crate::Error::Config(format!(
                    "{name} must be between 0 and 1, got {v}"
                )))
            }
        };
        check_fraction("counter.visibility_threshold", self.counter.visibility_threshold)?;
        check_fraction("reveal.threshold", self.reveal.threshold)?;
        check_fraction("reveal.bottom_margin", self.reveal.bottom_margin)?;
        Ok(())
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the configuration file path
    /// Always uses ~/.config/countup/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("countup")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the terminal page owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("countup.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counter_config() {
        let c = CounterConfig::default();
        assert_eq!(c.duration_ms, 3000);
        assert_eq!(c.fps, 30);
        assert_eq!(c.desired_steps, 38);
        assert_eq!(c.step_policy, StepPolicy::Tiered);
        assert_eq!(c.easing, EasingType::Cubic);
        assert_eq!(c.reduced_motion, None);
        assert_eq!(c.tick_interval(), Duration::from_millis(33));
    }

    #[test]
    fn test_tick_interval_floor() {
        let c = CounterConfig {
            fps: 240,
            ..Default::default()
        };
        assert_eq!(c.tick_interval(), Duration::from_millis(16));

        let zero = CounterConfig {
            fps: 0,
            ..Default::default()
        };
        assert_eq!(zero.tick_interval(), Duration::from_millis(33));
    }

    #[test]
    fn test_step_budget_derived_when_zero() {
        let c = CounterConfig {
            desired_steps: 0,
            ..Default::default()
        };
        assert_eq!(c.step_budget(), 90);
        assert_eq!(CounterConfig::default().step_budget(), 38);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.counter, CounterConfig::default());
        assert_eq!(config.page.stats.len(), 3);
        assert_eq!(config.reveal.text_delay_ms, 80);
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [counter]
            duration_ms = 1200
            step_policy = "nice"
            reduced_motion = true

            [[page.stats]]
            value = "2 500 t"
            label = "Steel placed"

            [[page.stats]]
            value = -3
            suffix = "%"
            label = "Broken"
            "#,
        )
        .unwrap();

        assert_eq!(config.counter.duration_ms, 1200);
        assert_eq!(config.counter.fps, 30);
        assert_eq!(config.counter.step_policy, StepPolicy::Nice);
        assert_eq!(config.counter.reduced_motion, Some(true));

        let targets = config.page.stat_targets();
        assert_eq!(targets[0].target, 2500);
        assert_eq!(targets[0].suffix.as_deref(), Some("t"));
        assert_eq!(targets[1].target, 0);
        assert_eq!(targets[1].suffix.as_deref(), Some("%"));
    }

    #[test]
    fn test_default_stats_match_site() {
        let targets = PageConfig::default().stat_targets();
        let values: Vec<u64> = targets.iter().map(|t| t.target).collect();
        assert_eq!(values, vec![120, 150_000, 10]);
        assert_eq!(targets[1].suffix.as_deref(), Some("m²"));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = AppConfig::from_toml("[counter]\nvisibility_threshold = 1.5\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let back = AppConfig::from_toml(&text).unwrap();
        assert_eq!(back.counter, config.counter);
        assert_eq!(back.page.stat_targets(), config.page.stat_targets());
    }

    #[test]
    fn test_save_and_load_from_path() -> crate::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.counter.duration_ms = 500;
        config.save_to(&path)?;

        let loaded = AppConfig::load_from(&path)?;
        assert_eq!(loaded.counter.duration_ms, 500);
        Ok(())
    }

    #[test]
    fn test_missing_file_gives_defaults() -> crate::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let config = AppConfig::load_from(&dir.path().join("config.toml"))?;
        assert_eq!(config.counter.duration_ms, 3000);
        Ok(())
    }
}
