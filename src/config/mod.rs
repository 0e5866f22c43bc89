//! Configuration: types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{LoadResult, create_template_config, load_config_from_xml_path, load_or_init};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "HYM_CUSTODY_CONFIG";

pub const DATA_SUBDIR_DEFAULT: &str = "HYM_Data";
pub const SILO_SUBDIR_DEFAULT: &str = "SILO_Data";
pub const PROBE_SUBDIR_DEFAULT: &str = "Probe_Data";
pub const SILO_EXE_DEFAULT: &str = "./HYM_SILO.exe";
pub const PROBE_EXE_DEFAULT: &str = "./Probe_SILO.exe";
pub const DATA_FLAGS_DEFAULT: &str = "11111";
