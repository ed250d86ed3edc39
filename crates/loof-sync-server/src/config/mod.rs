//! Configuration loading and resolution.

use loof_sync::{LookupResult, RegistryConfig, TitleLayout};

/// Default listen address for the HTTP boundary.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3100";

/// Registry settings given on the command line; each one beats the env.
#[derive(Debug, Clone, Default)]
pub struct RegistryOverrides {
    pub search_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub title_layout: Option<TitleLayout>,
}

/// Resolve the registry configuration: CLI flag > `LOOF_*` env var > default.
pub fn resolve_registry_config(overrides: &RegistryOverrides) -> LookupResult<RegistryConfig> {
    let mut config = RegistryConfig::from_env()?;
    apply_overrides(&mut config, overrides);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut RegistryConfig, overrides: &RegistryOverrides) {
    if let Some(url) = &overrides.search_url {
        config.search_url = url.clone();
    }
    if let Some(ms) = overrides.timeout_ms {
        config.request_timeout_ms = ms;
    }
    if let Some(layout) = overrides.title_layout {
        config.title_layout = layout;
    }
}

/// Resolve the listen address: explicit > `LOOF_SYNC_ADDR` > default.
pub fn resolve_addr(explicit: Option<&str>) -> String {
    if let Some(addr) = explicit {
        return addr.to_string();
    }

    if let Ok(env_addr) = std::env::var("LOOF_SYNC_ADDR") {
        return env_addr;
    }

    DEFAULT_ADDR.to_string()
}
