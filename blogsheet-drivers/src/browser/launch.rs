use blogsheet_config::BrowserConfig;
use serde_json::json;
use webdriver::capabilities::Capabilities;

/// Chrome command-line arguments for a session.
pub fn build_chrome_arguments(cfg: &BrowserConfig) -> Vec<String> {
    let mut args = cfg.args.clone();
    if cfg.headless {
        for flag in ["--headless=new", "--disable-gpu"] {
            if !args.iter().any(|a| a == flag) {
                args.push(flag.to_string());
            }
        }
    }
    args
}

/// WebDriver capabilities: Chrome options plus an `eager` page-load strategy,
/// so navigation returns once the DOM is ready.
pub fn build_capabilities(cfg: &BrowserConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    let mut chrome_opts = serde_json::Map::new();
    chrome_opts.insert("args".to_string(), json!(build_chrome_arguments(cfg)));
    if let Some(binary) = &cfg.executable_path {
        chrome_opts.insert("binary".to_string(), json!(binary.to_string_lossy()));
    }
    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
    caps.insert("pageLoadStrategy".to_string(), json!("eager"));
    caps
}
