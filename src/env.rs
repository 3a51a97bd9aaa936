//! Typed environment variables
//!
//! Every variable the tool reads is declared here with its name, default and
//! description, so that parsing and documentation stay in one place.

use std::env;
use std::fmt;
use std::time::Duration;

/// Environment variable parse error
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// Accessor for a single environment variable
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// Process-level variables
pub mod core {
    use super::*;

    /// Log level
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "TRANSQUOTER_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// Disables colored error output
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // Any non-empty value disables color
            Ok(!value.is_empty())
        }
    }
}

/// Variables overriding the render configuration
pub mod render {
    use super::*;

    /// Per-fetch timeout
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "TRANSQUOTER_TIMEOUT";
        const DEFAULT: Option<Duration> = None;
        const DESCRIPTION: &'static str = "Network timeout per fetch in seconds (0 disables)";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds > 3600 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout too long (max 3600 seconds)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }

    /// User agent sent with every request
    pub struct UserAgent;
    impl EnvVar<String> for UserAgent {
        const NAME: &'static str = "TRANSQUOTER_USER_AGENT";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "User-Agent header sent with each request";

        fn parse(value: &str) -> EnvResult<String> {
            let agent = value.trim();
            if agent.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "User agent cannot be empty".to_string(),
                });
            }
            Ok(agent.to_string())
        }
    }

    /// Fallback charset for markup documents
    pub struct DefaultCharset;
    impl EnvVar<String> for DefaultCharset {
        const NAME: &'static str = "TRANSQUOTER_DEFAULT_CHARSET";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str =
            "Charset assumed for markup documents that declare none";

        fn parse(value: &str) -> EnvResult<String> {
            let label = value.trim().to_lowercase();
            if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Unknown charset '{}'", value),
                });
            }
            Ok(label)
        }
    }
}

/// Generates Markdown documentation for every variable
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");

    docs.push_str("## Core\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: info)\n",
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::NoColor::NAME,
        core::NoColor::DESCRIPTION,
        core::NoColor::DEFAULT
    ));

    docs.push_str("\n## Rendering\n\n");
    docs.push_str(&format!(
        "- `{}`: {}\n",
        render::Timeout::NAME,
        render::Timeout::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {}\n",
        render::UserAgent::NAME,
        render::UserAgent::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {}\n",
        render::DefaultCharset::NAME,
        render::DefaultCharset::DESCRIPTION
    ));

    docs
}
