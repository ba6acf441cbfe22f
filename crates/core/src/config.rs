use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `REVPULSE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Dashboard range key applied when the caller does not pick one.
    /// Unrecognized keys resolve to the current calendar year.
    #[serde(default = "default_range")]
    pub default_range: String,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub goal: GoalConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Number of future months to project.
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,
    /// Historical window the projection averages over.
    #[serde(default = "default_lookback_months")]
    pub lookback_months: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalConfig {
    /// Annual revenue target in minor currency units; 0 disables goal pacing.
    #[serde(default = "default_revenue_target")]
    pub annual_revenue_target: i64,
    #[serde(default = "default_ahead_factor")]
    pub ahead_factor: f64,
    #[serde(default = "default_behind_factor")]
    pub behind_factor: f64,
}

// Default functions
fn default_range() -> String {
    "current_year".to_string()
}
fn default_horizon_months() -> u32 {
    6
}
fn default_lookback_months() -> u32 {
    12
}
fn default_revenue_target() -> i64 {
    0
}
fn default_ahead_factor() -> f64 {
    1.1
}
fn default_behind_factor() -> f64 {
    0.8
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_months: default_horizon_months(),
            lookback_months: default_lookback_months(),
        }
    }
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            annual_revenue_target: default_revenue_target(),
            ahead_factor: default_ahead_factor(),
            behind_factor: default_behind_factor(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_range: default_range(),
            forecast: ForecastConfig::default(),
            goal: GoalConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("REVPULSE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
