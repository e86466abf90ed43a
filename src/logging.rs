use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, TimesliceError};

/// Installs a fmt subscriber filtered by `filter` (same syntax as `RUST_LOG`).
///
/// Only the first call installs anything; later calls leave the installed subscriber alone.
pub fn init(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter).map_err(|e| TimesliceError::Config(e.to_string()))?;
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        debug!("subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_fine() {
        assert!(init("timeslice=debug").is_ok());
        assert!(init("warn").is_ok());
    }

    #[test]
    fn bad_filter_is_a_config_error() {
        assert!(matches!(
            init("timeslice=notalevel"),
            Err(TimesliceError::Config(_))
        ));
    }
}
