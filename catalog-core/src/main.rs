#![windows_subsystem = "windows"]
use std::io::{self, BufRead, Write};
use std::panic::AssertUnwindSafe;

use catalog_core::config::CmsConfig;
use catalog_core::protocol::Session;
use catalog_core::services::editor::CatalogEditor;

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn main() {
    let config_path = CmsConfig::default_path();
    let config = match CmsConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            init_logging("info");
            log::error!("{e}");
            std::process::exit(2);
        }
    };

    init_logging(&config.log_level);
    log::info!("config: {}", config_path.display());

    let mut editor = match CatalogEditor::from_config(&config) {
        Ok(e) => e,
        Err(e) => {
            log::error!("failed to start editor: {e}");
            std::process::exit(2);
        }
    };
    editor.load();

    let mut session = Session::new(editor, config.fs_access);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| session.handle(&line)));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => serde_json::json!({
                "status": "error",
                "message": "internal core error"
            })
            .to_string(),
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}
