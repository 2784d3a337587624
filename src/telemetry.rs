use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `--verbose` is given and `RUST_LOG` is unset
pub const VERBOSE_FILTER: &str = "gradebook=debug";
/// Filter used otherwise
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Logs go to stderr so stdout stays
/// machine-readable for `--format tsv|json`.
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(verbose))
            .with_context(|| format!("invalid log filter '{}'", default_filter(verbose)))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "gradebook=debug");
        assert_eq!(default_filter(false), "warn");
    }

    #[test]
    fn test_filters_parse() {
        assert!(EnvFilter::try_new(VERBOSE_FILTER).is_ok());
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
