use anyhow::{anyhow, Result};
use twyg::{LogLevel, OptsBuilder};

/// Pick the log level: each `-v` raises it, otherwise the configured level,
/// otherwise info.
fn level(verbosity: u8, configured: Option<&str>) -> LogLevel {
    match verbosity {
        0 => match configured.map(str::to_ascii_lowercase).as_deref() {
            Some("trace") => LogLevel::Trace,
            Some("debug") => LogLevel::Debug,
            _ => LogLevel::Info,
        },
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

pub fn setup(verbosity: u8, configured: Option<&str>) -> Result<()> {
    let opts = OptsBuilder::new()
        .coloured(true)
        .level(level(verbosity, configured))
        .build()
        .map_err(|e| anyhow!("Invalid logging options: {e:?}"))?;
    twyg::setup(opts).map_err(|e| anyhow!("Failed to set up logging: {e:?}"))?;
    Ok(())
}
