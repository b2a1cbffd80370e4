pub mod args;
pub mod reconcile;
pub mod schedule;

use std::path::Path;

use anyhow::Result;

use berthwatch::config::Config;
use berthwatch::error::BerthwatchErrorTrait;
use berthwatch::models::KeySchema;
use berthwatch::schedule::PageFailure;

// Re-export command functions for convenience
pub use reconcile::reconcile;
pub use schedule::schedule;

/// Load configuration from `path`, or from the environment when no file is given
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    config.validate()?;
    Ok(config)
}

/// Apply a `--key-schema` override
pub fn apply_key_schema(config: &mut Config, key_schema: Option<KeySchema>) {
    if let Some(schema) = key_schema {
        tracing::debug!(schema = %schema, "Key schema overridden on the command line");
        config.schedule.key_schema = schema;
    }
}

/// Warn the operator that the schedule may be incomplete
pub fn report_partial(failure: Option<&PageFailure>, truncated: bool) {
    for warning in partial_warnings(failure, truncated) {
        eprintln!("Warning: {warning}");
    }
}

fn partial_warnings(failure: Option<&PageFailure>, truncated: bool) -> Vec<String> {
    let mut warnings = Vec::new();
    if let Some(failure) = failure {
        let hint = if failure.error.is_recoverable() {
            "; try again later"
        } else {
            ""
        };
        let category = failure.error.category().as_str();
        warnings.push(format!(
            "schedule page {} failed with a {category} error ({}); \
             showing data from earlier pages only{hint}",
            failure.page, failure.error
        ));
    }
    if truncated {
        warnings.push("page limit reached; the schedule may be incomplete".to_string());
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use berthwatch::error::FetchError;

    #[test]
    fn test_partial_warnings_name_category() {
        let failure = PageFailure {
            page: 3,
            error: FetchError::ServerError(503),
        };

        let warnings = partial_warnings(Some(&failure), true);

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("schedule page 3 failed with a network error"));
        assert!(warnings[0].ends_with("try again later"));
        assert!(warnings[1].starts_with("page limit reached"));
    }

    #[test]
    fn test_decode_failure_has_no_retry_hint() {
        let failure = PageFailure {
            page: 1,
            error: FetchError::Decode("expected value".to_string()),
        };

        let warnings = partial_warnings(Some(&failure), false);

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("parsing error"));
        assert!(!warnings[0].contains("try again"));
    }

    #[test]
    fn test_complete_fetch_has_no_warnings() {
        assert!(partial_warnings(None, false).is_empty());
    }
}
