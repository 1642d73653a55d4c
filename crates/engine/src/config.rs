//! Site configuration loading.
//!
//! Files are JSON unless the extension is `.yaml`/`.yml`. Header values may
//! reference environment variables with `${env:NAME}`; they are resolved at
//! load time so secrets never need to be written into the file.

use routegen_types::SiteConfig;
use routegen_util::{InterpolationError, expand_tilde, interpolate_string};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the default configuration path.
pub const CONFIG_PATH_ENV: &str = "ROUTEGEN_CONFIG_PATH";
const DEFAULT_CONFIG_FILE: &str = "routegen.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("header '{header}' of parameter '{param}' in route '{route}': {source}")]
    Interpolation {
        route: String,
        param: String,
        header: String,
        #[source]
        source: InterpolationError,
    },
}

/// Returns the configuration path: `$ROUTEGEN_CONFIG_PATH` or `./routegen.json`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Read, parse and interpolate the site configuration at `path`.
pub fn load_site_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = if is_yaml(path) {
        serde_yaml::from_str::<SiteConfig>(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str::<SiteConfig>(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?
    };

    interpolate_headers(&mut config)?;
    debug!(path = %path.display(), routes = config.routes.len(), "loaded site configuration");
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Resolve `${env:NAME}` references in every header value.
pub fn interpolate_headers(config: &mut SiteConfig) -> Result<(), ConfigError> {
    for (route, route_config) in config.routes.iter_mut() {
        for (param, param_config) in route_config.params.iter_mut() {
            for (header, value) in param_config.headers.iter_mut() {
                *value = interpolate_string(value).map_err(|source| ConfigError::Interpolation {
                    route: route.clone(),
                    param: param.clone(),
                    header: header.clone(),
                    source,
                })?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn default_path_honors_environment_override() {
        temp_env::with_var(CONFIG_PATH_ENV, Some("~/sites/blog/routegen.yaml"), || {
            assert_eq!(default_config_path(), expand_tilde("~/sites/blog/routegen.yaml"));
        });
        temp_env::with_var_unset(CONFIG_PATH_ENV, || {
            assert_eq!(default_config_path(), PathBuf::from("routegen.json"));
        });
    }

    #[test]
    fn loads_json_and_interpolates_headers() {
        let file = write_config(
            ".json",
            r#"{
                "maxConcurrentFetches": 4,
                "routes": {
                    "/blog/:slug": {
                        "type": "strapi",
                        "slug": {
                            "url": "https://cms.local/graphql",
                            "query": "{ articles { slug } }",
                            "headers": { "authorization": "Bearer ${env:ROUTEGEN_TEST_LOAD_TOKEN}" },
                            "resultsPath": "data.articles",
                            "property": "slug"
                        }
                    }
                }
            }"#,
        );

        let config = temp_env::with_var("ROUTEGEN_TEST_LOAD_TOKEN", Some("s3cret"), || load_site_config(file.path())).expect("config");
        assert_eq!(config.max_concurrent_fetches, Some(4));
        let slug = config.routes["/blog/:slug"].param("slug").expect("slug config");
        assert_eq!(slug.headers["authorization"], "Bearer s3cret");
        assert_eq!(slug.results_path.as_deref(), Some("data.articles"));
    }

    #[test]
    fn loads_yaml_by_extension() {
        let file = write_config(
            ".yml",
            "routes:\n  /tags/:tag:\n    type: strapi\n    tag:\n      url: https://cms.local/tags\n      suppressErrors: true\n",
        );

        let config = load_site_config(file.path()).expect("config");
        let tag = config.routes["/tags/:tag"].param("tag").expect("tag config");
        assert_eq!(tag.url, "https://cms.local/tags");
        assert!(tag.suppress_errors);
    }

    #[test]
    fn missing_env_var_names_the_header() {
        let file = write_config(
            ".json",
            r#"{ "routes": { "/p/:id": { "type": "strapi", "id": { "url": "https://cms.local", "headers": { "x-api-key": "${env:ROUTEGEN_TEST_ABSENT}" } } } } }"#,
        );

        let err = temp_env::with_var_unset("ROUTEGEN_TEST_ABSENT", || load_site_config(file.path())).expect_err("missing env");
        assert!(matches!(err, ConfigError::Interpolation { ref header, .. } if header == "x-api-key"));
    }

    #[test]
    fn missing_file_and_bad_json_are_reported() {
        let err = load_site_config(Path::new("/definitely/not/here/routegen.json")).expect_err("missing");
        assert!(matches!(err, ConfigError::NotFound(_)));

        let file = write_config(".json", "{ not json");
        assert!(matches!(load_site_config(file.path()), Err(ConfigError::Json { .. })));
    }
}
