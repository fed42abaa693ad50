use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_when_nothing_set() {
    let cfg = ServerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.catalog_path, PathBuf::from(DEFAULT_CATALOG_PATH));
    assert_eq!(cfg.layout, LayoutSettings::default());
    assert_eq!(cfg.max_sessions, DEFAULT_MAX_SESSIONS);
    assert_eq!(cfg.session_idle, Duration::from_secs(DEFAULT_SESSION_IDLE_SECS));
}

#[test]
fn parses_overrides() {
    let cfg = ServerConfig::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("PANEL_CATALOG_PATH", "/etc/solar/panels.json"),
        ("LAYOUT_GAP_PX", " 12.5 "),
        ("HISTORY_LIMIT", "200"),
        ("MAX_SESSIONS", "5"),
        ("SESSION_IDLE_SECS", "90"),
    ]))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.catalog_path, PathBuf::from("/etc/solar/panels.json"));
    assert!((cfg.layout.gap_px - 12.5).abs() < f64::EPSILON);
    assert_eq!(cfg.layout.history_limit, Some(200));
    assert_eq!(cfg.max_sessions, 5);
    assert_eq!(cfg.session_idle, Duration::from_secs(90));
}

#[test]
fn bad_port_errors() {
    let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    assert!(err.to_string().contains("eighty"));
}

#[test]
fn negative_gap_errors() {
    let err = ServerConfig::from_lookup(lookup(&[("LAYOUT_GAP_PX", "-1")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "LAYOUT_GAP_PX", .. }));
}

#[test]
fn zero_history_limit_errors() {
    let err = ServerConfig::from_lookup(lookup(&[("HISTORY_LIMIT", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "HISTORY_LIMIT", .. }));
}

#[test]
fn zero_max_sessions_errors() {
    let err = ServerConfig::from_lookup(lookup(&[("MAX_SESSIONS", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "MAX_SESSIONS", .. }));
}

#[tokio::test]
async fn missing_catalog_file_errors() {
    let cfg = ServerConfig::from_lookup(lookup(&[("PANEL_CATALOG_PATH", "/nonexistent/panels.json")])).unwrap();
    let err = cfg.load_catalog().await.unwrap_err();
    assert!(matches!(err, ConfigError::CatalogRead { .. }));
}

#[tokio::test]
async fn bundled_catalog_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CATALOG_PATH);
    let cfg = ServerConfig { catalog_path: path, ..ServerConfig::from_lookup(lookup(&[])).unwrap() };
    let catalog = cfg.load_catalog().await.unwrap();
    assert!(!catalog.is_empty());
}

#[test]
fn zero_session_idle_errors() {
    let err = ServerConfig::from_lookup(lookup(&[("SESSION_IDLE_SECS", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "SESSION_IDLE_SECS", .. }));
}
