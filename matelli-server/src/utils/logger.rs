//! Logging Infrastructure
//!
//! `RUST_LOG` wins when set; otherwise `level` is the default filter.
//! With a log directory, output goes to a daily rolling file instead of
//! stdout.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// 初始化日志（仅输出到 stdout）
pub fn init_logger(level: &str) {
    init_logger_with_file(level, None);
}

/// Initialize the logger with optional daily rolling file output
pub fn init_logger_with_file(level: &str, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        match std::fs::create_dir_all(log_path) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(log_path, "matelli-server");
                subscriber.with_ansi(false).with_writer(file_appender).init();
                return;
            }
            Err(e) => eprintln!("Cannot create log directory {dir}: {e}; logging to stdout"),
        }
    }

    subscriber.init();
}
