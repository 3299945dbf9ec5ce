//! Logging setup: console output plus a daily rolling log file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config;

const LOG_FILE_PREFIX: &str = "xirtam-admin.log";

/// Build the filter: `RUST_LOG` wins, else info (debug when verbose).
fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "xirtam_admin=debug,info"
    } else {
        "info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live until exit.
/// When the log directory cannot be created only console logging is set up.
pub fn init(verbose: bool) -> Option<WorkerGuard> {
    let console = tracing_subscriber::fmt::layer().with_target(false);

    let file = config::log_dir().and_then(|dir| match std::fs::create_dir_all(&dir) {
        Ok(()) => Some(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX)),
        Err(e) => {
            eprintln!("Cannot create log directory {}: {e}", dir.display());
            None
        }
    });

    match file {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer);
            tracing_subscriber::registry()
                .with(env_filter(verbose))
                .with(console)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter(verbose))
                .with(console)
                .init();
            None
        }
    }
}
