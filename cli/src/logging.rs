//! Logger bootstrap for the `todo` binary. Output goes to stderr so it never
//! mixes with the rendered list on stdout.

use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};
use log::debug;

pub fn init_logging(spec: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    let handle = Logger::try_with_env_or_str(spec)?
        .log_to_stderr()
        .format(flexi_logger::detailed_format)
        .start()?;

    debug!(
        "event=app_start module=cli status=ok version={}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_starts_with_detailed_format() {
        let handle = init_logging("debug").unwrap();
        log::info!("event=test status=ok");
        handle.flush();
    }
}
