//! Deployment environment detection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Variables consulted, in order, to detect the environment
const ENVIRONMENT_VARS: [&str; 3] = ["ENVIRONMENT", "ENV", "RUST_ENV"];

/// Deployment environment of the registration services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development with the mock auth provider
    #[default]
    Development,
    /// Pre-production deployment
    Staging,
    /// Live deployment
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    pub fn is_development(&self) -> bool {
        *self == Environment::Development
    }

    /// Detect the environment from the first set variable; unknown values
    /// fall back to development.
    pub fn from_env() -> Self {
        ENVIRONMENT_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// TOML file layered under `MEDREG__` variables, e.g. `config.staging.toml`
    pub fn config_file(&self) -> String {
        format!("config.{}.toml", self.as_str())
    }

    /// Dotenv file loaded before the plain `.env`, e.g. `.env.staging`
    pub fn env_file(&self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("local".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!(" Stage ".parse::<Environment>(), Ok(Environment::Staging));
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Production));
        assert!("qa-cluster".parse::<Environment>().is_err());
    }

    #[test]
    fn test_file_names_follow_environment() {
        assert_eq!(Environment::Staging.config_file(), "config.staging.toml");
        assert_eq!(Environment::Production.env_file(), ".env.production");
        assert_eq!(Environment::default().to_string(), "development");
    }
}
