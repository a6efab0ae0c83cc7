use blogsheet_config::{BlogsheetConfigLoader, EnvironmentMode};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

const LEGACY: [(&str, Option<&str>); 9] = [
    ("EMAIL", None),
    ("SPREADSHEET_ID", None),
    ("PORT", None),
    ("CREDENTIALS_PATH", None),
    ("BROWSER_EXECUTABLE_PATH", None),
    ("PUPPETEER_EXECUTABLE_PATH", None),
    ("WEBDRIVER_URL", None),
    ("APP_ENV", None),
    ("BLOGSHEET__SERVER__PORT", None),
];

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn defaults_without_any_source() {
    temp_env::with_vars(LEGACY, || {
        let config = BlogsheetConfigLoader::new().load().expect("defaults load");

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.site.base_url, "https://xepelin.com/blog");
        assert_eq!(config.browser.webdriver_url, "http://localhost:9515");
        assert_eq!(config.sheets.range, "Sheet1!A:D");
        assert_eq!(config.sheets.credentials.mode, EnvironmentMode::Development);
        assert!(config.sheets.spreadsheet_id.is_none());
        assert!(config.notify.email.is_none());
    });
}

#[test]
#[serial]
fn file_values_and_placeholders() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
site:
  base_url: "https://example.com/blog/"
sheets:
  spreadsheet_id: "${TEST_SHEET_ID}"
  range: "Noticias!A:D"
browser:
  headless: false
  max_load_more_clicks: 3
"#;
    let p = write_yaml(&tmp, "blogsheet.yaml", file_yaml);

    let mut vars = LEGACY.to_vec();
    vars.push(("TEST_SHEET_ID", Some("sheet-from-env")));
    temp_env::with_vars(vars, || {
        let config = BlogsheetConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load file config");

        assert_eq!(
            config.sheets.spreadsheet_id.as_deref(),
            Some("sheet-from-env")
        );
        assert_eq!(config.sheets.range, "Noticias!A:D");
        assert!(!config.browser.headless);
        assert_eq!(config.browser.max_load_more_clicks, 3);
        assert_eq!(
            config.site.category_url("pymes"),
            "https://example.com/blog/pymes"
        );
    });
}

#[test]
#[serial]
fn legacy_variables_override_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "blogsheet.yaml",
        "server:\n  port: 8080\nnotify:\n  email: file@example.com\n",
    );

    let vars = [
        ("EMAIL", Some("ops@example.com")),
        ("SPREADSHEET_ID", Some("abc")),
        ("PORT", Some("4000")),
        ("CREDENTIALS_PATH", Some("/secrets/key.json")),
        ("BROWSER_EXECUTABLE_PATH", None),
        ("PUPPETEER_EXECUTABLE_PATH", Some("/usr/bin/chromium")),
        ("WEBDRIVER_URL", None),
        ("APP_ENV", Some("Production")),
        ("BLOGSHEET__SERVER__PORT", None),
    ];
    temp_env::with_vars(vars, || {
        let config = BlogsheetConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load with legacy env");

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.notify.email.as_deref(), Some("ops@example.com"));
        assert_eq!(
            config.sheets.spreadsheet_url().as_deref(),
            Some("https://docs.google.com/spreadsheets/d/abc")
        );
        assert_eq!(
            config.sheets.credentials.path,
            PathBuf::from("/secrets/key.json")
        );
        assert_eq!(
            config.browser.executable_path,
            Some(PathBuf::from("/usr/bin/chromium"))
        );
        assert_eq!(config.sheets.credentials.mode, EnvironmentMode::Production);
    });
}

#[test]
#[serial]
fn prefixed_variables_override_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "blogsheet.yaml", "server:\n  port: 8080\n");

    let mut vars = LEGACY.to_vec();
    vars.retain(|(k, _)| *k != "BLOGSHEET__SERVER__PORT");
    vars.push(("BLOGSHEET__SERVER__PORT", Some("9090")));
    temp_env::with_vars(vars, || {
        let config = BlogsheetConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load with prefixed env");
        assert_eq!(config.server.port, 9090);
    });
}

#[test]
#[serial]
fn invalid_port_is_rejected() {
    let mut vars = LEGACY.to_vec();
    vars.retain(|(k, _)| *k != "PORT");
    vars.push(("PORT", Some("not-a-port")));
    temp_env::with_vars(vars, || {
        let err = BlogsheetConfigLoader::new().load().unwrap_err();
        assert!(err.to_string().contains("PORT"));
    });
}

#[test]
#[serial]
fn optional_file_may_be_missing() {
    let tmp = TempDir::new().unwrap();
    temp_env::with_vars(LEGACY, || {
        let config = BlogsheetConfigLoader::new()
            .with_optional_file(tmp.path().join("absent.yaml"))
            .load()
            .expect("missing optional file is fine");
        assert_eq!(config.server.port, 3000);
    });
}
