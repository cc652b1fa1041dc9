use anyhow::{bail, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Map a configured level name to a filter.
///
/// Accepts `DEBUG`, `INFO`, `WARNING`, `ERROR` and `CRITICAL` in any case.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    let filter = match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => LevelFilter::TRACE,
        "DEBUG" => LevelFilter::DEBUG,
        "INFO" => LevelFilter::INFO,
        "WARNING" | "WARN" => LevelFilter::WARN,
        "ERROR" | "CRITICAL" => LevelFilter::ERROR,
        _ => bail!("Unknown log level: {}", level),
    };
    Ok(filter)
}

/// Build the filter for `level`; a non-empty `rust_log` replaces it.
pub fn build_filter(level: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    let level = parse_level(level)?;

    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => Ok(EnvFilter::try_new(directives)?),
        None => Ok(EnvFilter::default().add_directive(level.into())),
    }
}

/// Install the global subscriber.
pub fn init_logging(level: &str) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, rust_log.as_deref())?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level("info").unwrap(), LevelFilter::INFO);
        assert_eq!(parse_level("Warning").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("ERROR").unwrap(), LevelFilter::ERROR);
        assert_eq!(parse_level("CRITICAL").unwrap(), LevelFilter::ERROR);
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(parse_level("LOUD").is_err());
        assert!(parse_level("").is_err());
    }

    #[test]
    fn test_build_filter() {
        let filter = build_filter("WARNING", None).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));

        let filter = build_filter("CRITICAL", Some("")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn rust_log_overrides_level() {
        let filter = build_filter("INFO", Some("debug")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn level_is_validated_even_with_rust_log() {
        assert!(build_filter("LOUD", Some("debug")).is_err());
    }
}
