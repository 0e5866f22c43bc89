use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use hym_custody::config::CONFIG_ENV;
use hym_custody::{LoadResult, LogLevel, default_config_path, load_config_from_xml_path, load_or_init};

#[test]
#[serial]
fn env_config_is_loaded() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("custom.xml");
    fs::write(
        &cfg_path,
        r#"<config>
  <code_path>/home/hym/code</code_path>
  <run_path>/archive/run_042</run_path>
  <silo_exe>/opt/hym/HYM_SILO.exe</silo_exe>
  <log_level>info</log_level>
</config>"#,
    )
    .unwrap();

    unsafe { std::env::set_var(CONFIG_ENV, &cfg_path) };
    let resolved = default_config_path();
    let loaded = load_or_init(None);
    unsafe { std::env::remove_var(CONFIG_ENV) };

    assert_eq!(resolved, Some(cfg_path.clone()));
    let (cfg, how) = loaded.unwrap();
    assert_eq!(how, LoadResult::Loaded(cfg_path));
    assert_eq!(cfg.code_path, Some(PathBuf::from("/home/hym/code")));
    assert_eq!(cfg.silo_exe, PathBuf::from("/opt/hym/HYM_SILO.exe"));
    assert_eq!(cfg.probe_exe, PathBuf::from("./Probe_SILO.exe"));
    assert_eq!(cfg.log_level, LogLevel::Info);
    let paths = cfg.pipeline_paths().unwrap();
    assert_eq!(paths.layout.data_dir.path, PathBuf::from("/archive/run_042/HYM_Data"));
}

#[test]
#[serial]
fn env_config_that_does_not_exist_is_an_error() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("absent.xml");
    unsafe { std::env::set_var(CONFIG_ENV, &cfg_path) };
    let loaded = load_or_init(None);
    unsafe { std::env::remove_var(CONFIG_ENV) };

    assert!(loaded.is_err());
    assert!(!cfg_path.exists(), "no template is written for an explicit path");
}

#[test]
fn bad_field_mask_in_config_is_rejected() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><data_flags>1012</data_flags></config>").unwrap();
    let err = load_config_from_xml_path(&cfg_path).unwrap_err();
    assert!(format!("{err:#}").contains("data_flags"), "{err:#}");
}

#[test]
fn malformed_xml_is_an_error() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><run_path>/x</config>").unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());
}
