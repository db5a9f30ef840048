use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main import configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Default provider to use when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback configuration for automatic provider switching
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Page rendering configuration
    #[serde(default)]
    pub renderer: RendererConfig,
    /// HTML cleaning limits
    #[serde(default)]
    pub cleaner: CleanerConfig,
    /// Image ranking token lists
    #[serde(default)]
    pub images: ImageRankingConfig,
    /// Token budgets for each kind of model call
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Recipe analyzer settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Recipe backend used by the chat assistant
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            fallback: FallbackConfig::default(),
            renderer: RendererConfig::default(),
            cleaner: CleanerConfig::default(),
            images: ImageRankingConfig::default(),
            generation: GenerationConfig::default(),
            analysis: AnalysisConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Configuration for a specific LLM provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    pub enabled: bool,
    /// Model identifier (e.g., "gpt-4.1-mini", "zephyr")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom, proxy or self-hosted endpoints)
    pub base_url: Option<String>,
}

/// Configuration for provider fallback and retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    /// Whether fallback is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
    /// Number of retry attempts per provider before fallback
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Initial delay between retries in milliseconds (grows linearly per attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            order: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Configuration for page rendering
#[derive(Debug, Deserialize, Clone)]
pub struct RendererConfig {
    /// Maximum time spent waiting for a page, in milliseconds
    #[serde(default = "default_render_timeout_ms")]
    pub timeout_ms: u64,
    /// Base URL of a remote rendering service; plain HTTP fetching is used when unset
    pub page_scriber_url: Option<String>,
    /// User agent sent with plain HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_render_timeout_ms(),
            page_scriber_url: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Limits applied when turning HTML into prompt text
#[derive(Debug, Deserialize, Clone)]
pub struct CleanerConfig {
    /// Cleaned text is truncated to this many characters
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    /// Below this many characters the aggressive cleaning is discarded
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            min_chars: default_min_chars(),
        }
    }
}

/// URL tokens used by the image ranker
#[derive(Debug, Deserialize, Clone)]
pub struct ImageRankingConfig {
    /// Path segments of thumbnail services that serve the main recipe photo
    #[serde(default = "default_thumbnail_paths")]
    pub thumbnail_paths: Vec<String>,
    /// Size tokens marking a full-size photo on a thumbnail service
    #[serde(default = "default_featured_sizes")]
    pub featured_sizes: Vec<String>,
    /// Tokens marking author photos or tiny variants on a thumbnail service
    #[serde(default = "default_featured_exclusions")]
    pub featured_exclusions: Vec<String>,
    /// Tokens marking a large image anywhere
    #[serde(default = "default_large_tokens")]
    pub large_tokens: Vec<String>,
    /// Tokens marking a small thumbnail anywhere
    #[serde(default = "default_small_tokens")]
    pub small_tokens: Vec<String>,
}

impl Default for ImageRankingConfig {
    fn default() -> Self {
        Self {
            thumbnail_paths: default_thumbnail_paths(),
            featured_sizes: default_featured_sizes(),
            featured_exclusions: default_featured_exclusions(),
            large_tokens: default_large_tokens(),
            small_tokens: default_small_tokens(),
        }
    }
}

/// Maximum new tokens for each kind of model call
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_extraction_max_tokens")]
    pub extraction_max_tokens: u32,
    #[serde(default = "default_time_max_tokens")]
    pub time_max_tokens: u32,
    #[serde(default = "default_repair_max_tokens")]
    pub repair_max_tokens: u32,
    #[serde(default = "default_analysis_max_tokens")]
    pub analysis_max_tokens: u32,
    #[serde(default = "default_chat_max_tokens")]
    pub chat_max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            extraction_max_tokens: default_extraction_max_tokens(),
            time_max_tokens: default_time_max_tokens(),
            repair_max_tokens: default_repair_max_tokens(),
            analysis_max_tokens: default_analysis_max_tokens(),
            chat_max_tokens: default_chat_max_tokens(),
        }
    }
}

/// Validation bounds and defaults for the recipe analyzer
#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Run the analyzer after an import that left fields unset
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_min_minutes")]
    pub min_minutes: u32,
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,
    /// Used whenever the model's estimate is missing or out of bounds
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
    #[serde(default = "default_description_max_chars")]
    pub description_max_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_minutes: default_min_minutes(),
            max_minutes: default_max_minutes(),
            default_minutes: default_minutes(),
            description_max_chars: default_description_max_chars(),
        }
    }
}

/// Recipe backend configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchConfig {
    /// Base URL of the recipe backend; search is disabled when unset
    pub backend_url: Option<String>,
}

// Default value functions
fn default_provider() -> String {
    "openai".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_render_timeout_ms() -> u64 {
    15_000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_max_chars() -> usize {
    8000
}

fn default_min_chars() -> usize {
    100
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_thumbnail_paths() -> Vec<String> {
    strings(&["/thmb/"])
}

fn default_featured_sizes() -> Vec<String> {
    strings(&["750x0", "800x", "1200x", "1500x"])
}

fn default_featured_exclusions() -> Vec<String> {
    strings(&["40x0", "58x0", "76x0", "headshot", "avatar"])
}

fn default_large_tokens() -> Vec<String> {
    strings(&["1500x", "1200x", "800x", "750x", "large", "original"])
}

fn default_small_tokens() -> Vec<String> {
    strings(&["75x75", "100x100", "150x150", "40x0", "58x0"])
}

fn default_extraction_max_tokens() -> u32 {
    4096
}

fn default_time_max_tokens() -> u32 {
    2048
}

fn default_repair_max_tokens() -> u32 {
    200
}

fn default_analysis_max_tokens() -> u32 {
    2048
}

fn default_chat_max_tokens() -> u32 {
    256
}

fn default_true() -> bool {
    true
}

fn default_min_minutes() -> u32 {
    1
}

fn default_max_minutes() -> u32 {
    480
}

fn default_minutes() -> u32 {
    30
}

fn default_description_max_chars() -> usize {
    500
}

impl ImportConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_IMPORT__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_IMPORT__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`ImportConfig::load`] for the precedence rules.
pub fn load_config() -> Result<ImportConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_IMPORT__CLEANER__MAX_CHARS
        .add_source(
            Environment::with_prefix("RECIPE_IMPORT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
