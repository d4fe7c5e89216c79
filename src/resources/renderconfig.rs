//! Render configuration resource.
//!
//! Manages compositing and caching settings loaded from an INI configuration
//! file. Provides defaults for safe startup and methods to load/save
//! configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [render]
//! software = true
//! alpha_blending = true
//! compositing = true
//!
//! [cache]
//! alpha_fix = false
//! disable_basic_caching = false
//! disable_advanced_caching = false
//! delayed_recompose = true
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_SOFTWARE: bool = true;
const DEFAULT_ALPHA_BLENDING: bool = true;
const DEFAULT_COMPOSITING: bool = true;
const DEFAULT_ALPHA_FIX: bool = false;
const DEFAULT_DISABLE_BASIC_CACHING: bool = false;
const DEFAULT_DISABLE_ADVANCED_CACHING: bool = false;
const DEFAULT_DELAYED_RECOMPOSE: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./render.ini";

/// Snapshot of the flags a compound sprite reads once at construction.
///
/// Kept `Copy` so each sprite carries its own policy and never observes a
/// config change mid-lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Push alpha changes down to individual layers on deep stacks.
    pub alpha_fix: bool,
    /// Never flatten layer stacks; always draw per layer.
    pub disable_basic_caching: bool,
    /// Flatten, but never pool previous composites.
    pub disable_advanced_caching: bool,
    /// Rate-limit recomposition to roughly ten engine ticks.
    pub delayed_recompose: bool,
    /// Whether the platform supports offscreen buffer compositing at all.
    pub compositing: bool,
    /// Produce the translucent composite variant.
    pub alpha_blending: bool,
    /// The software rendering path is active.
    pub software_renderer: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            alpha_fix: DEFAULT_ALPHA_FIX,
            disable_basic_caching: DEFAULT_DISABLE_BASIC_CACHING,
            disable_advanced_caching: DEFAULT_DISABLE_ADVANCED_CACHING,
            delayed_recompose: DEFAULT_DELAYED_RECOMPOSE,
            compositing: DEFAULT_COMPOSITING,
            alpha_blending: DEFAULT_ALPHA_BLENDING,
            software_renderer: DEFAULT_SOFTWARE,
        }
    }
}

/// Render configuration resource.
///
/// Stores the compositing capability and caching flags, and the path of the
/// INI file they are loaded from.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Flags handed to compound sprites at construction.
    pub policy: CachePolicy,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            policy: CachePolicy::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [render] section
        if let Some(software) = config.getbool("render", "software").ok().flatten() {
            self.policy.software_renderer = software;
        }
        if let Some(blending) = config.getbool("render", "alpha_blending").ok().flatten() {
            self.policy.alpha_blending = blending;
        }
        if let Some(compositing) = config.getbool("render", "compositing").ok().flatten() {
            self.policy.compositing = compositing;
        }

        // [cache] section
        if let Some(fix) = config.getbool("cache", "alpha_fix").ok().flatten() {
            self.policy.alpha_fix = fix;
        }
        if let Some(basic) = config
            .getbool("cache", "disable_basic_caching")
            .ok()
            .flatten()
        {
            self.policy.disable_basic_caching = basic;
        }
        if let Some(advanced) = config
            .getbool("cache", "disable_advanced_caching")
            .ok()
            .flatten()
        {
            self.policy.disable_advanced_caching = advanced;
        }
        if let Some(delayed) = config.getbool("cache", "delayed_recompose").ok().flatten() {
            self.policy.delayed_recompose = delayed;
        }

        info!(
            "Loaded render config: software={}, alpha_blending={}, compositing={}, alpha_fix={}, \
             disable_basic={}, disable_advanced={}, delayed_recompose={}",
            self.policy.software_renderer,
            self.policy.alpha_blending,
            self.policy.compositing,
            self.policy.alpha_fix,
            self.policy.disable_basic_caching,
            self.policy.disable_advanced_caching,
            self.policy.delayed_recompose
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    #[allow(dead_code)]
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [render] section
        config.set(
            "render",
            "software",
            Some(self.policy.software_renderer.to_string()),
        );
        config.set(
            "render",
            "alpha_blending",
            Some(self.policy.alpha_blending.to_string()),
        );
        config.set(
            "render",
            "compositing",
            Some(self.policy.compositing.to_string()),
        );

        // [cache] section
        config.set("cache", "alpha_fix", Some(self.policy.alpha_fix.to_string()));
        config.set(
            "cache",
            "disable_basic_caching",
            Some(self.policy.disable_basic_caching.to_string()),
        );
        config.set(
            "cache",
            "disable_advanced_caching",
            Some(self.policy.disable_advanced_caching.to_string()),
        );
        config.set(
            "cache",
            "delayed_recompose",
            Some(self.policy.delayed_recompose.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved render config to {:?}", self.config_path);

        Ok(())
    }
}
