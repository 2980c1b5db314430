//! Logger bootstrap for the server binary.
//!
//! Library code only uses the `log` facade; this installs the backend.
//! Messages follow `event=<name> status=<ok|error|...> key=value`.

use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};
use log::info;

/// Start logging to stderr. `spec` is a flexi_logger specification such as
/// `info` or `info, todo_server::routes=debug`; `RUST_LOG` takes precedence.
///
/// The returned handle must be kept alive for the lifetime of the process.
pub fn init_logging(spec: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    let handle = Logger::try_with_env_or_str(spec)?
        .log_to_stderr()
        .format(flexi_logger::detailed_format)
        .start()?;

    info!(
        "event=app_start module=server status=ok platform={} version={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}
