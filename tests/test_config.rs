use docserve::config::Config;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.server.backlog, 5);
    assert_eq!(cfg.server.read_buffer_size, 1024);
    assert_eq!(cfg.server.read_timeout_ms, None);
    assert_eq!(cfg.static_files.root, PathBuf::from("."));
    assert_eq!(cfg.server.listen_addr(), "127.0.0.1:8080");
}

#[test]
fn test_config_listen_override() {
    let cfg = Config::from_lookup(lookup_from(&[("LISTEN", "0.0.0.0:3000")])).unwrap();

    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 3000);
    assert_eq!(cfg.server.listen_addr(), "0.0.0.0:3000");
}

#[test]
fn test_config_individual_overrides() {
    let cfg = Config::from_lookup(lookup_from(&[
        ("DOCSERVE_HOST", "127.0.0.2"),
        ("DOCSERVE_PORT", "9000"),
        ("DOCSERVE_BACKLOG", "64"),
        ("DOCSERVE_BUFFER", "2048"),
        ("DOCSERVE_READ_TIMEOUT_MS", "1500"),
        ("DOCSERVE_ROOT", "/srv/www"),
    ]))
    .unwrap();

    assert_eq!(cfg.server.listen_addr(), "127.0.0.2:9000");
    assert_eq!(cfg.server.backlog, 64);
    assert_eq!(cfg.server.read_buffer_size, 2048);
    assert_eq!(cfg.server.read_timeout(), Some(Duration::from_millis(1500)));
    assert_eq!(cfg.static_files.root, PathBuf::from("/srv/www"));
}

#[test]
fn test_config_invalid_port_is_error() {
    let result = Config::from_lookup(lookup_from(&[("DOCSERVE_PORT", "eighty")]));
    assert!(result.is_err());
}

#[test]
fn test_config_invalid_listen_is_error() {
    let result = Config::from_lookup(lookup_from(&[("LISTEN", "localhost")]));
    assert!(result.is_err());
}

#[test]
fn test_config_zero_backlog_rejected() {
    let result = Config::from_lookup(lookup_from(&[("DOCSERVE_BACKLOG", "0")]));
    assert!(result.is_err());
}

#[test]
fn test_config_yaml_partial() {
    let yaml = r#"
server:
  port: 9090
  read_timeout_ms: 250
static_files:
  root: ./public
"#;
    let cfg = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 9090);
    assert_eq!(cfg.server.backlog, 5);
    assert_eq!(cfg.server.read_timeout_ms, Some(250));
    assert_eq!(cfg.static_files.root, PathBuf::from("./public"));
}

#[test]
fn test_config_yaml_malformed() {
    assert!(Config::from_yaml_str("server: [1, 2").is_err());
}

#[test]
fn test_config_file_then_env() {
    let path = std::env::temp_dir().join(format!("docserve-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "server:\n  port: 7000\n  backlog: 16\n").unwrap();
    let path_str = path.to_string_lossy().into_owned();

    let cfg = Config::from_lookup(lookup_from(&[
        ("DOCSERVE_CONFIG", path_str.as_str()),
        ("DOCSERVE_PORT", "7001"),
    ]))
    .unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(cfg.server.port, 7001);
    assert_eq!(cfg.server.backlog, 16);
}

#[test]
fn test_config_missing_file_is_error() {
    let result = Config::from_lookup(lookup_from(&[(
        "DOCSERVE_CONFIG",
        "/nonexistent/docserve.yaml",
    )]));
    assert!(result.is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.server.listen_addr(), cfg2.server.listen_addr());
}
