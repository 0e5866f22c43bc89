//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Creates a commented template at the default location on first use.
//!
//! Unknown XML fields are a hard error so typos surface instead of being ignored.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::{
    CONFIG_ENV, DATA_FLAGS_DEFAULT, DATA_SUBDIR_DEFAULT, PROBE_EXE_DEFAULT, PROBE_SUBDIR_DEFAULT, SILO_EXE_DEFAULT,
    SILO_SUBDIR_DEFAULT,
};
use crate::fields::FieldMask;
use crate::platform::{set_dir_mode_0700, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    code_path: Option<String>,
    run_path: Option<String>,
    data_subdir: Option<String>,
    silo_subdir: Option<String>,
    probe_subdir: Option<String>,
    silo_exe: Option<String>,
    probe_exe: Option<String>,
    data_flags: Option<String>,
    #[serde(default, deserialize_with = "de_u32_trimmed_opt")]
    cycle: Option<u32>,
    phi_rot: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

// Trims surrounding whitespace; an empty element counts as unset.
fn de_u32_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<u32>().map(Some).map_err(serde::de::Error::custom),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// How the effective config came about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    /// Parsed from this file.
    Loaded(PathBuf),
    /// No file existed; a template was written here and defaults are in effect.
    CreatedTemplate(PathBuf),
    /// No file was found or written; defaults are in effect.
    Defaults,
}

fn xml_to_config(parsed: XmlConfig, path: &Path) -> Result<Config> {
    let mut cfg = Config::default();

    cfg.code_path = non_empty(parsed.code_path).map(PathBuf::from);
    cfg.run_path = non_empty(parsed.run_path).map(PathBuf::from);
    if let Some(s) = non_empty(parsed.data_subdir) {
        cfg.data_subdir = s;
    }
    if let Some(s) = non_empty(parsed.silo_subdir) {
        cfg.silo_subdir = s;
    }
    if let Some(s) = non_empty(parsed.probe_subdir) {
        cfg.probe_subdir = s;
    }
    if let Some(s) = non_empty(parsed.silo_exe) {
        cfg.silo_exe = s.into();
    }
    if let Some(s) = non_empty(parsed.probe_exe) {
        cfg.probe_exe = s.into();
    }
    if let Some(s) = non_empty(parsed.data_flags) {
        cfg.data_flags = s
            .parse::<FieldMask>()
            .with_context(|| format!("<data_flags> in '{}'", path.display()))?;
    }
    if let Some(c) = parsed.cycle {
        cfg.cycle = c;
    }
    if let Some(s) = non_empty(parsed.phi_rot) {
        cfg.phi_rot = s
            .parse::<f64>()
            .with_context(|| format!("<phi_rot> '{s}' in '{}' is not a number", path.display()))?;
    }
    if let Some(s) = non_empty(parsed.log_level) {
        match s.parse::<LogLevel>() {
            Ok(level) => cfg.log_level = level,
            Err(e) => warn!("{e} in '{}'; keeping '{}'", path.display(), cfg.log_level),
        }
    }
    // An empty <log_file/> disables file logging.
    if let Some(s) = parsed.log_file {
        let trimmed = s.trim();
        cfg.log_file = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents).map_err(|e| {
        let msg = e.to_string();
        if msg.contains("unknown field") {
            anyhow::anyhow!("Unknown field in config {}: {msg}. Refusing to start.", path.display())
        } else {
            anyhow::anyhow!("parse config xml '{}': {msg}", path.display())
        }
    })?;
    debug!(path = %path.display(), "parsed config xml");
    xml_to_config(parsed, path)
}

/// Resolve and load the config.
///
/// An explicit path (`--config`) or `HYM_CUSTODY_CONFIG` must name an existing
/// file. Otherwise the OS default is read, or a template is written there.
pub fn load_or_init(explicit: Option<&Path>) -> Result<(Config, LoadResult)> {
    let from_env = std::env::var_os(CONFIG_ENV).is_some();
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok((Config::default(), LoadResult::Defaults)),
        },
    };

    if path.exists() {
        let cfg = load_config_from_xml_path(&path)?;
        return Ok((cfg, LoadResult::Loaded(path)));
    }
    if explicit.is_some() || from_env {
        bail!("Config file not found: {}", path.display());
    }
    match create_template_config(&path) {
        Ok(()) => Ok((Config::default(), LoadResult::CreatedTemplate(path))),
        Err(e) => {
            warn!("Could not create template config at {}: {e:#}", path.display());
            Ok((Config::default(), LoadResult::Defaults))
        }
    }
}

/// Write the commented default template (0600, atomic, refuses symlinked ancestors).
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!("Refusing to create config: ancestor of {} is a symlink", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let content = format!(
        "<!--\n  hym_custody configuration (XML)\n\n    code_path     -> active code directory the simulation writes into\n    run_path      -> run archive directory\n    data_subdir   -> data storage subdirectory inside run_path\n    silo_subdir   -> SILO output subdirectory inside run_path\n    probe_subdir  -> probe output subdirectory inside run_path\n    silo_exe      -> SILO converter executable\n    probe_exe     -> probe extraction executable\n    data_flags    -> field mask p n B v J, e.g. 10110\n    cycle         -> cycle to convert (0 = all)\n    phi_rot       -> probe array rotation in degrees\n    log_level     -> quiet | normal | info | debug\n    log_file      -> path to log file (empty disables file logging)\n\n  CLI flags override XML values.\n-->\n<config>\n  <code_path></code_path>\n  <run_path></run_path>\n  <data_subdir>{DATA_SUBDIR_DEFAULT}</data_subdir>\n  <silo_subdir>{SILO_SUBDIR_DEFAULT}</silo_subdir>\n  <probe_subdir>{PROBE_SUBDIR_DEFAULT}</probe_subdir>\n  <silo_exe>{SILO_EXE_DEFAULT}</silo_exe>\n  <probe_exe>{PROBE_EXE_DEFAULT}</probe_exe>\n  <data_flags>{DATA_FLAGS_DEFAULT}</data_flags>\n  <cycle>0</cycle>\n  <phi_rot>0.0</phi_rot>\n  <log_level>normal</log_level>\n  <log_file>{suggested_log}</log_file>\n</config>\n"
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn template_parses_to_defaults() {
        let td = tempdir().unwrap();
        let path = td.path().join("cfg").join("config.xml");
        create_template_config(&path).unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.code_path, None);
        assert_eq!(cfg.data_subdir, DATA_SUBDIR_DEFAULT);
        assert_eq!(cfg.data_flags.to_string(), DATA_FLAGS_DEFAULT);
        assert_eq!(cfg.cycle, 0);
    }

    #[test]
    fn values_are_trimmed_and_mapped() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(
            &path,
            "<config>\n <code_path> /code </code_path>\n <run_path>/runs/r7</run_path>\n <data_flags>10100</data_flags>\n <cycle> 12 </cycle>\n <phi_rot>22.5</phi_rot>\n <log_level>DEBUG</log_level>\n <log_file></log_file>\n</config>",
        )
        .unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.code_path, Some(PathBuf::from("/code")));
        assert_eq!(cfg.run_path, Some(PathBuf::from("/runs/r7")));
        assert_eq!(cfg.data_flags.to_string(), "10100");
        assert_eq!(cfg.cycle, 12);
        assert_eq!(cfg.phi_rot, 22.5);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, None);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config><code_pth>/x</code_pth></config>").unwrap();
        let err = load_config_from_xml_path(&path).unwrap_err();
        assert!(err.to_string().contains("Unknown field"), "{err}");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let td = tempdir().unwrap();
        assert!(load_or_init(Some(&td.path().join("nope.xml"))).is_err());
    }
}
