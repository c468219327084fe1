use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_MAX_RECENT_MESSAGES: usize = 20;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AskConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub conversation: ConversationConfig,
    pub upstream: UpstreamConfig,
    pub request: RequestConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model that answers the question (e.g., gemini-2.5-flash)
    pub answer_model: String,
    /// Model that rewrites the running summary
    pub summary_model: String,
}

#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// When false the summary is echoed back unchanged and no second call is made.
    pub summary_enabled: bool,
    /// Only the most recent messages up to this count are replayed into prompts.
    pub max_recent_messages: usize,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub request_timeout_ms: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Largest accepted `/ask` body. Pages with heavy `pageHtml` need headroom
    /// over axum's 2 MB default.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// `*` allows every origin.
    pub allowed_origins: Vec<String>,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl AskConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let api_key = get_env("GEMINI_API_KEY", None, is_prod)?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_API_KEY is set but empty"
            )));
        }

        let answer_model = get_env("ASK_MODEL", Some(DEFAULT_MODEL), is_prod)?;
        let summary_model = get_env("ASK_SUMMARY_MODEL", Some(&answer_model), is_prod)?;

        Ok(AskConfig {
            common: common_config,
            google: GoogleConfig {
                api_key,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
            },
            models: ModelConfig {
                answer_model,
                summary_model,
            },
            conversation: ConversationConfig {
                summary_enabled: parse_bool(
                    "ASK_SUMMARY_ENABLED",
                    &get_env("ASK_SUMMARY_ENABLED", Some("true"), is_prod)?,
                )?,
                max_recent_messages: parse_env(
                    "ASK_MAX_RECENT_MESSAGES",
                    &get_env(
                        "ASK_MAX_RECENT_MESSAGES",
                        Some(&DEFAULT_MAX_RECENT_MESSAGES.to_string()),
                        is_prod,
                    )?,
                )?,
            },
            upstream: UpstreamConfig {
                request_timeout_ms: parse_env(
                    "ASK_REQUEST_TIMEOUT_MS",
                    &get_env(
                        "ASK_REQUEST_TIMEOUT_MS",
                        Some(&DEFAULT_REQUEST_TIMEOUT_MS.to_string()),
                        is_prod,
                    )?,
                )?,
                max_retries: parse_env(
                    "ASK_MAX_RETRIES",
                    &get_env(
                        "ASK_MAX_RETRIES",
                        Some(&DEFAULT_MAX_RETRIES.to_string()),
                        is_prod,
                    )?,
                )?,
            },
            request: RequestConfig {
                max_body_bytes: parse_env(
                    "ASK_MAX_BODY_BYTES",
                    &get_env(
                        "ASK_MAX_BODY_BYTES",
                        Some(&DEFAULT_MAX_BODY_BYTES.to_string()),
                        is_prod,
                    )?,
                )?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some("*"),
                    is_prod,
                )?),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} has invalid boolean value '{}'",
            key,
            raw
        ))),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_splits_and_trims() {
        assert_eq!(
            parse_origins("http://localhost:3000, chrome-extension://abc ,"),
            vec![
                "http://localhost:3000".to_string(),
                "chrome-extension://abc".to_string()
            ]
        );
    }

    #[test]
    fn wildcard_origin_allows_any() {
        let cors = CorsConfig {
            allowed_origins: parse_origins("*"),
        };
        assert!(cors.allows_any_origin());
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("K", "TRUE").unwrap());
        assert!(parse_bool("K", "1").unwrap());
        assert!(!parse_bool("K", "off").unwrap());
        assert!(parse_bool("K", "maybe").is_err());
    }

    #[test]
    fn parse_env_rejects_garbage() {
        assert_eq!(parse_env::<u64>("K", " 1500 ").unwrap(), 1500);
        assert!(parse_env::<u64>("K", "soon").is_err());
    }

    #[test]
    fn get_env_without_default_is_an_error() {
        let err = get_env("ASK_SERVICE_TEST_SURELY_UNSET", None, false).unwrap_err();
        assert!(err.to_string().contains("ASK_SERVICE_TEST_SURELY_UNSET"));
    }

    #[test]
    fn get_env_in_prod_ignores_defaults() {
        assert!(get_env("ASK_SERVICE_TEST_SURELY_UNSET", Some("x"), true).is_err());
    }
}
