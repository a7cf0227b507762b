use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use secrecy::SecretString;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The GoInstant application secret key, in base64 or base64url format.
    #[arg(short, long, env = "GOINSTANT_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Path to a JSON file containing the user record to sign.
    /// The record is read from standard input when not set.
    #[arg(short, long, env)]
    user_file: Option<PathBuf>,

    /// Path to a JSON file containing an object of additional JWT headers.
    #[arg(long, env)]
    headers_file: Option<PathBuf>,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Warn,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Returns the secret key text, if configured.
    pub fn secret_key(&self) -> Option<SecretString> {
        self.secret_key.clone().map(SecretString::new)
    }

    /// Returns the user record path, or `None` to read standard input.
    pub fn user_file(&self) -> Option<&Path> {
        self.user_file.as_deref()
    }

    /// Returns the extra headers path, if configured.
    pub fn headers_file(&self) -> Option<&Path> {
        self.headers_file.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_parses_all_arguments() {
        let config = Config::try_parse_from([
            "goinstant-sign",
            "--secret-key",
            "HKYdFdnezle2yrI2_Ph3cHz144bISk-cvuAbeAAA999",
            "--user-file",
            "user.json",
            "--headers-file",
            "headers.json",
            "--log-level-filter",
            "DEBUG",
        ])
        .unwrap();

        assert_eq!(
            config.secret_key().unwrap().expose_secret(),
            "HKYdFdnezle2yrI2_Ph3cHz144bISk-cvuAbeAAA999"
        );
        assert_eq!(config.user_file(), Some(Path::new("user.json")));
        assert_eq!(config.headers_file(), Some(Path::new("headers.json")));
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let result = Config::try_parse_from(["goinstant-sign", "--log-level-filter", "LOUD"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_short_flags() {
        let config =
            Config::try_parse_from(["goinstant-sign", "-s", "a2V5", "-l", "INFO"]).unwrap();
        assert_eq!(config.secret_key().unwrap().expose_secret(), "a2V5");
        assert_eq!(config.log_level_filter, LevelFilter::Info);
    }
}
