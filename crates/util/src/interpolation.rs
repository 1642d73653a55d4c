//! `${env:NAME}` references in configuration values.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

static ENV_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{env:([\w+_-]*)}").expect("env placeholder regex should compile"));

/// Replace every `${env:NAME}` in `value` with that variable's value.
///
/// Fails on the first variable that is not set.
pub fn interpolate_string(value: &str) -> Result<String, InterpolationError> {
    let mut rendered = String::with_capacity(value.len());
    let mut tail = 0;
    for caps in ENV_REGEX.captures_iter(value) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let resolved = std::env::var(name.as_str()).map_err(|_| InterpolationError::MissingEnvVar {
            name: name.as_str().to_string(),
        })?;
        debug!(var = name.as_str(), "resolved env reference");
        rendered.push_str(&value[tail..whole.start()]);
        rendered.push_str(&resolved);
        tail = whole.end();
    }
    rendered.push_str(&value[tail..]);
    Ok(rendered)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("environment variable '{name}' is not set")]
    MissingEnvVar { name: String },
}
