use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::host::SplitDirection;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub split: Option<SplitDirection>,
    pub filetype: Option<String>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            split: other.split.or(self.split),
            filetype: other.filetype.clone().or_else(|| self.filetype.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("jpview").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("jpview")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("jpview").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("jpview").join("config");
        }
    }

    PathBuf::from(".jpviewrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".jpviewrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# jpview defaults (saved with --save)".to_string());
    if flags.watch {
        lines.push("--watch".to_string());
    }
    if let Some(split) = flags.split {
        lines.push(format!("--split {}", split.as_str()));
    }
    if let Some(filetype) = &flags.filetype {
        lines.push(format!("--filetype {filetype}"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this crate understands out of a token list. Unknown tokens
/// (the file, the query, other options) are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--watch" || token == "-w" {
            flags.watch = true;
        } else if token == "--split" {
            if let Some(next) = tokens.get(i + 1) {
                flags.split = parse_split(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--split=") {
            flags.split = parse_split(value);
        } else if token == "--filetype" {
            if let Some(next) = tokens.get(i + 1) {
                flags.filetype = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--filetype=") {
            flags.filetype = Some(value.to_string());
        }
        i += 1;
    }
    flags
}

fn parse_split(s: &str) -> Option<SplitDirection> {
    match s {
        "vertical" => Some(SplitDirection::Vertical),
        "horizontal" => Some(SplitDirection::Horizontal),
        _ => None,
    }
}
