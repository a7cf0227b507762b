use goinstant_auth::{Record, Signer};
use log::{debug, error, info};
use secrecy::ExposeSecret;
use serde_json::Value;
use service::{config::Config, logging::Logger};
use std::error::Error as StdError;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let secret_key = config.secret_key();
    let signer = match Signer::new(
        secret_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .unwrap_or_default(),
    ) {
        Ok(signer) => signer,
        Err(e) => {
            error!("Failed to create signer: {e}");
            std::process::exit(1);
        }
    };
    debug!("Loaded {} byte secret key", signer.key_len());

    let user_data = match read_json(config.user_file()) {
        Ok(value) => value,
        Err(e) => {
            error!("Failed to read user record: {e}");
            std::process::exit(1);
        }
    };

    let extra_headers = match config.headers_file() {
        Some(path) => match read_headers(path) {
            Ok(headers) => headers,
            Err(e) => {
                error!("Failed to read extra headers from {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Record::new(),
    };

    match signer.sign(&user_data, &extra_headers) {
        Ok(token) => {
            info!("Signed token for user record");
            println!("{token}");
        }
        Err(e) => {
            error!("Failed to sign token: {e}");
            std::process::exit(1);
        }
    }
}

/// Reads a JSON document from `path`, or from standard input when no path is given.
fn read_json(path: Option<&Path>) -> Result<Value, Box<dyn StdError>> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            raw
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

fn read_headers(path: &Path) -> Result<Record, Box<dyn StdError>> {
    match read_json(Some(path))? {
        Value::Object(headers) => Ok(headers),
        _ => Err("extra headers must be a JSON object".into()),
    }
}
