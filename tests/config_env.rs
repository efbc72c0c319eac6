// tests/config_env.rs
use scenario_planner::config::analysis::{
    AnalysisConfig, ENV_ANALYSIS_API_BASE, ENV_ANALYSIS_CONFIG_PATH, ENV_ANALYSIS_ENABLED,
    ENV_ANALYSIS_TEST_MODE, ENV_ANALYSIS_TIMEOUT_SECS,
};
use std::{env, fs};

fn clear_env() {
    for k in [
        ENV_ANALYSIS_CONFIG_PATH,
        ENV_ANALYSIS_ENABLED,
        ENV_ANALYSIS_API_BASE,
        ENV_ANALYSIS_TIMEOUT_SECS,
        ENV_ANALYSIS_TEST_MODE,
    ] {
        env::remove_var(k);
    }
}

#[test]
fn load_from_file_reads_analysis_section() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("analysis.toml");
    fs::write(
        &p,
        r#"
[analysis]
enabled = false
api_base = "http://10.0.0.5:9000/"
timeout_secs = 15
"#,
    )
    .unwrap();
    let cfg = AnalysisConfig::load_from_file(&p).unwrap();
    assert!(!cfg.enabled);
    assert_eq!(cfg.api_base, "http://10.0.0.5:9000");
    assert_eq!(cfg.timeout_secs, 15);
}

#[test]
fn load_from_missing_file_is_an_error_with_path() {
    let err = AnalysisConfig::load_from_file("/definitely/not/here.toml").unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.toml"));
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // isolate CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) nothing → built-in defaults
    let cfg = AnalysisConfig::load_default().unwrap();
    assert_eq!(cfg, AnalysisConfig::default());

    // 2) ./config/analysis.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("analysis.toml"),
        "[analysis]\napi_base = \"http://fallback:1\"\n",
    )
    .unwrap();
    let cfg = AnalysisConfig::load_default().unwrap();
    assert_eq!(cfg.api_base, "http://fallback:1");

    // 3) env path wins over the fallback file
    let p_env = tmp.path().join("other.toml");
    fs::write(&p_env, "[analysis]\napi_base = \"http://from-env:2\"\n").unwrap();
    env::set_var(ENV_ANALYSIS_CONFIG_PATH, p_env.display().to_string());
    let cfg = AnalysisConfig::load_default().unwrap();
    assert_eq!(cfg.api_base, "http://from-env:2");

    // 4) env path pointing nowhere is an error, not a silent fallback
    env::set_var(ENV_ANALYSIS_CONFIG_PATH, tmp.path().join("nope.toml").display().to_string());
    assert!(AnalysisConfig::load_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn env_overrides_beat_file_values() {
    clear_env();
    let base = AnalysisConfig::from_toml_str(
        "[analysis]\nenabled = true\napi_base = \"http://file:1\"\ntimeout_secs = 30\n",
    )
    .unwrap();

    env::set_var(ENV_ANALYSIS_ENABLED, "off");
    env::set_var(ENV_ANALYSIS_API_BASE, " http://env:3/ ");
    env::set_var(ENV_ANALYSIS_TIMEOUT_SECS, "5");
    env::set_var(ENV_ANALYSIS_TEST_MODE, "MOCK");
    let cfg = base.clone().with_env_overrides().unwrap();
    assert!(!cfg.enabled);
    assert_eq!(cfg.api_base, "http://env:3");
    assert_eq!(cfg.timeout_secs, 5);
    assert!(cfg.fixture);

    env::set_var(ENV_ANALYSIS_TIMEOUT_SECS, "soon");
    assert!(base.clone().with_env_overrides().is_err());

    clear_env();
    env::set_var(ENV_ANALYSIS_ENABLED, "perhaps");
    assert!(base.with_env_overrides().is_err());
    clear_env();
}
