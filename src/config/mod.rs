//! Configuration management for `ams`.
//!
//! Settings are resolved in this order (first wins):
//! - CLI flags (`--dir`, `--json`, `--no-color`, `--sort`)
//! - Environment (`AMS_DIR`, `AMS_JSON` via clap; `NO_COLOR`)
//! - Store config file (`<store root>/config.yaml`)
//! - Built-in defaults

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ams_lib::store::DEFAULT_DIR_NAME;
use ams_lib::{SortKey, StoreConfig};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AmsError, Result};

/// File name of the optional config file inside the store root.
pub const CONFIG_FILE: &str = "config.yaml";

/// Template written by `ams init`.
pub const CONFIG_TEMPLATE: &str = r"# ams configuration
# json: false      # print JSON instead of text
# color: true      # colorize status labels on a terminal
# sort: id         # default list order: id, created, updated, title, status
";

/// Contents of `config.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub json: Option<bool>,
    pub color: Option<bool>,
    pub sort: Option<String>,
}

/// Values taken from the command line (including clap's env fallbacks).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub no_color: bool,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreConfig,
    pub json: bool,
    pub color: bool,
    pub default_sort: Option<SortKey>,
}

/// Resolve the store root: an explicit directory, or `./.ams`.
///
/// # Errors
///
/// Returns `Io` if the working directory cannot be determined.
pub fn resolve_root(dir: Option<&Path>) -> Result<PathBuf> {
    let cwd = env::current_dir()?;
    let root = dir.map_or_else(|| cwd.join(DEFAULT_DIR_NAME), |dir| cwd.join(dir));
    Ok(dunce::simplified(&root).to_path_buf())
}

/// Read `config.yaml` from the store root if it exists.
///
/// # Errors
///
/// Returns `Config` if the file exists but is not valid.
pub fn load_file_config(root: &Path) -> Result<FileConfig> {
    let path = root.join(CONFIG_FILE);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(e) => return Err(AmsError::Io(e)),
    };
    // A file holding only comments (like the init template) sets nothing.
    let has_content = raw.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if !has_content {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&raw)
        .map_err(|e| AmsError::Config(format!("{}: {e}", path.display())))
}

/// Whether an environment flag is set to a truthy value.
pub fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|value| {
        !matches!(
            value.trim().to_lowercase().as_str(),
            "" | "0" | "false" | "no" | "off"
        )
    })
}

/// Merge CLI overrides, environment and the config file.
///
/// # Errors
///
/// Returns an error if the root cannot be resolved or the config file is
/// invalid.
pub fn load(cli: &CliOverrides) -> Result<Config> {
    let root = resolve_root(cli.dir.as_deref())?;
    let file = load_file_config(&root)?;
    debug!(root = %root.display(), ?file, "resolved configuration");
    merge(root, &file, cli, env::var_os("NO_COLOR").is_some())
}

fn merge(
    root: PathBuf,
    file: &FileConfig,
    cli: &CliOverrides,
    no_color_env: bool,
) -> Result<Config> {
    let default_sort: Option<SortKey> = file.sort.as_deref().map(str::parse).transpose()?;
    Ok(Config {
        store: StoreConfig::new(root),
        json: cli.json || file.json.unwrap_or(false),
        color: !cli.no_color && !no_color_env && file.color.unwrap_or(true),
        default_sort,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_file_config(dir.path()).unwrap(), FileConfig::default());
    }

    #[test]
    fn test_template_parses_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), CONFIG_TEMPLATE).unwrap();
        assert_eq!(load_file_config(dir.path()).unwrap(), FileConfig::default());
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "json: true\ncolor: false\nsort: updated\n",
        )
        .unwrap();
        let file = load_file_config(dir.path()).unwrap();
        let config = merge(
            dir.path().to_path_buf(),
            &file,
            &CliOverrides::default(),
            false,
        )
        .unwrap();
        assert!(config.json);
        assert!(!config.color);
        assert_eq!(config.default_sort, Some(SortKey::Updated));
        assert_eq!(config.store.root, dir.path());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "colour: true\n").unwrap();
        let err = load_file_config(dir.path()).unwrap_err();
        assert!(matches!(err, AmsError::Config(_)));
    }

    #[test]
    fn test_cli_and_env_override_file() {
        let file = FileConfig {
            color: Some(true),
            ..FileConfig::default()
        };
        let cli = CliOverrides {
            json: true,
            no_color: true,
            ..CliOverrides::default()
        };
        let config = merge(PathBuf::from("/tmp/x"), &file, &cli, false).unwrap();
        assert!(config.json);
        assert!(!config.color);

        let config = merge(
            PathBuf::from("/tmp/x"),
            &file,
            &CliOverrides::default(),
            true,
        )
        .unwrap();
        assert!(!config.color);
    }

    #[test]
    fn test_bad_sort_in_file() {
        let file = FileConfig {
            sort: Some("priority".into()),
            ..FileConfig::default()
        };
        let result = merge(PathBuf::from("/tmp/x"), &file, &CliOverrides::default(), false);
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_resolve_root_default_and_explicit() {
        let cwd = env::current_dir().unwrap();
        assert_eq!(resolve_root(None).unwrap(), cwd.join(".ams"));
        assert_eq!(
            resolve_root(Some(Path::new("/srv/tracker"))).unwrap(),
            PathBuf::from("/srv/tracker")
        );
    }
}
