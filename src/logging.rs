use anyhow::{Context, Result};
use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle, WriteMode};
use log::error;

use crate::rizzroast::store::data_dir;

const DEFAULT_LOG_SPEC: &str = "warn,rizzroast=debug,rizzroast_model=debug,linegen=debug";

/// Logs to `<data_dir>/logs`, info and above also to stderr. `RUST_LOG` overrides the levels.
pub fn init() -> Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(DEFAULT_LOG_SPEC)
        .context("Invalid log specification")?
        .log_to_file(
            FileSpec::default()
                .directory(data_dir().join("logs"))
                .basename("rizzroast"),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .duplicate_to_stderr(Duplicate::Info)
        .start()
        .context("Cannot start logger")?;
    exit_on_panic(logger.clone());
    Ok(logger)
}

// log, run the default hook and exit the process
fn exit_on_panic(logger: LoggerHandle) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!("Panic: {panic_info}");
        logger.flush();
        default_hook(panic_info);
        std::process::exit(1);
    }));
}
