use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use cross_xdg::BaseDirs;

use crate::error::MachineError;
use crate::memory::{self, Cell, Memory};

/// Name of the config file looked up in the XDG config home.
pub const CONFIG_FILE: &str = "bf.toml";

pub const ENV_SIZE: &str = "BF_MEMORY_SIZE";
pub const ENV_MINIMUM: &str = "BF_MEMORY_MIN";
pub const ENV_MAXIMUM: &str = "BF_MEMORY_MAX";
pub const ENV_DEFAULT: &str = "BF_MEMORY_DEFAULT";

/// Parameters for building a [`Memory`] tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    pub size: usize,
    pub minimum: Cell,
    pub maximum: Cell,
    pub default: Cell,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: memory::DEFAULT_SIZE,
            minimum: memory::MIN_VALUE,
            maximum: memory::MAX_VALUE,
            default: memory::MIN_VALUE,
        }
    }
}

/// Per-field overrides, e.g. from command-line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryOverrides {
    pub size: Option<usize>,
    pub minimum: Option<Cell>,
    pub maximum: Option<Cell>,
    pub default: Option<Cell>,
}

impl MemoryConfig {
    /// Validate the parameters and allocate the tape.
    pub fn build(&self) -> Result<Memory, MachineError> {
        Memory::new(self.size, self.minimum, self.maximum, self.default)
    }

    /// Resolve flags -> environment -> config file -> defaults.
    pub fn resolve(flags: MemoryOverrides) -> Self {
        let from_file = config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|content| Self::default().apply(from_toml(&content)))
            .unwrap_or_default();
        from_file
            .apply(from_env(|key| std::env::var(key).ok()))
            .apply(flags)
    }

    /// Replace every field that `overrides` sets.
    pub fn apply(mut self, overrides: MemoryOverrides) -> Self {
        if let Some(v) = overrides.size { self.size = v; }
        if let Some(v) = overrides.minimum { self.minimum = v; }
        if let Some(v) = overrides.maximum { self.maximum = v; }
        if let Some(v) = overrides.default { self.default = v; }
        self
    }
}

/// Read overrides from environment variables via `lookup`. Unparsable values are ignored.
pub fn from_env<F>(lookup: F) -> MemoryOverrides
where
    F: Fn(&str) -> Option<String>,
{
    fn parse<T: FromStr>(raw: Option<String>) -> Option<T> {
        raw.and_then(|s| s.trim().parse().ok())
    }

    MemoryOverrides {
        size: parse(lookup(ENV_SIZE)),
        minimum: parse(lookup(ENV_MINIMUM)),
        maximum: parse(lookup(ENV_MAXIMUM)),
        default: parse(lookup(ENV_DEFAULT)),
    }
}

/// Read overrides from the `[memory]` section of a `bf.toml` document.
pub fn from_toml(content: &str) -> MemoryOverrides {
    // Very small line parser: `[section]` headers and `key = value` pairs.
    let mut in_memory = false;
    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            in_memory = line[1..line.len() - 1].trim() == "memory";
            continue;
        }
        if !in_memory { continue; }
        if let Some((key, value)) = line.split_once('=') {
            // Drop trailing comments and accept quoted numbers
            let value = value.split('#').next().unwrap_or_default().trim().trim_matches('"');
            map.insert(key.trim().to_string(), value.to_string());
        }
    }

    let mut overrides = MemoryOverrides::default();

    macro_rules! set {
        ($field:ident, $key:literal) => {
            if let Some(v) = map.get($key).and_then(|s| s.parse().ok()) { overrides.$field = Some(v); }
        };
    }

    set!(size, "size");
    set!(minimum, "minimum");
    set!(maximum, "maximum");
    set!(default, "default");

    overrides
}

/// `bf.toml` inside the XDG config home.
///
/// On Linux this is usually `~/.config/bf.toml`.
pub fn config_path() -> Option<PathBuf> {
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push(CONFIG_FILE);
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_memory_defaults() {
        let memory = MemoryConfig::default().build().unwrap();
        assert_eq!(memory, Memory::default());
    }

    #[test]
    fn build_validates() {
        let config = MemoryConfig { size: 0, ..MemoryConfig::default() };
        assert!(matches!(config.build(), Err(MachineError::InvalidConfiguration { .. })));
    }

    #[test]
    fn toml_memory_section_is_read() {
        let content = r#"
# colors are not ours
[colors]
size = 1

[memory]
size = 10
minimum = -5 # signed cells
maximum = "5"
default = 0
"#;
        let overrides = from_toml(content);
        assert_eq!(
            overrides,
            MemoryOverrides { size: Some(10), minimum: Some(-5), maximum: Some(5), default: Some(0) }
        );
    }

    #[test]
    fn toml_without_memory_section_overrides_nothing() {
        assert_eq!(from_toml("[other]\nsize = 3\n"), MemoryOverrides::default());
        assert_eq!(from_toml(""), MemoryOverrides::default());
    }

    #[test]
    fn bad_values_are_ignored() {
        let overrides = from_toml("[memory]\nsize = lots\nmaximum = 9\n");
        assert_eq!(overrides.size, None);
        assert_eq!(overrides.maximum, Some(9));
    }

    #[test]
    fn env_lookup_is_parsed() {
        let overrides = from_env(|key| match key {
            ENV_SIZE => Some("12".to_string()),
            ENV_MAXIMUM => Some(" 99 ".to_string()),
            ENV_DEFAULT => Some("nope".to_string()),
            _ => None,
        });
        assert_eq!(overrides.size, Some(12));
        assert_eq!(overrides.minimum, None);
        assert_eq!(overrides.maximum, Some(99));
        assert_eq!(overrides.default, None);
    }

    #[test]
    fn later_overrides_win() {
        let config = MemoryConfig::default()
            .apply(MemoryOverrides { size: Some(10), maximum: Some(10), ..Default::default() })
            .apply(MemoryOverrides { size: Some(20), ..Default::default() });
        assert_eq!(config.size, 20);
        assert_eq!(config.maximum, 10);
        assert_eq!(config.minimum, memory::MIN_VALUE);
    }
}
