pub mod field_paths;
pub mod http;
pub mod interpolation;
pub mod path_processing;
pub mod route_split;
pub mod template;

pub use field_paths::*;
pub use interpolation::*;
pub use path_processing::*;
pub use route_split::*;
pub use template::*;

use once_cell::sync::Lazy;
use regex::Regex;

static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization:\s*)([\w\-\.=:/+ ]+)",
        r"(?i)((?:^|\b)Bearer\s+)([A-Za-z0-9\-._~+/]+=*)",
        r"(?i)([A-Z0-9_]*?(KEY|TOKEN|SECRET|PASSWORD)=)([^\s&]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("redaction regex should compile"))
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for re in REDACT_PATTERNS.iter() {
        redacted = re
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}
