//! HS256 token signing for GoInstant users.
//!
//! A `Signer` owns the decoded application secret key and turns user records
//! into JWS Compact Serialization strings. It holds no mutable state, so one
//! instance can be shared across threads and used for any number of tokens.

use std::fmt;

use hmac::{Hmac, Mac};
use log::*;
use secrecy::{ExposeSecret, SecretVec};
use serde_json::{Map, Value};
use sha2::Sha256;

use crate::claims::{
    self, Record, MISSING_REQUIRED_KEY, OPTIONAL_CLAIMS, REQUIRED_CLAIMS, REQUIRED_GROUP_CLAIMS,
};
use crate::codec;
use crate::error::{invalid_key_error, signer_error, Error, InvalidKeyErrorKind, SignerErrorKind};

type HmacSha256 = Hmac<Sha256>;

/// Audience claim of every issued token.
pub const AUDIENCE: &str = "goinstant.net";

/// Minimum decoded secret key length in bytes.
pub const MIN_KEY_LENGTH: usize = 32;

const KEY_FORMAT_MESSAGE: &str = "Signer requires key in base64url or base64 format";

/// Creates JWTs from user records, signing with a GoInstant app secret key.
pub struct Signer {
    binary_key: SecretVec<u8>,
}

impl Signer {
    /// Create a signer from a base64 or base64url secret key.
    ///
    /// Padding and embedded whitespace are tolerated.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidKey` error when the key is empty, is not base64, or
    /// decodes to fewer than 32 bytes.
    pub fn new(secret_key: &str) -> Result<Self, Error> {
        if secret_key.is_empty() {
            return Err(invalid_key_error(
                InvalidKeyErrorKind::Missing,
                KEY_FORMAT_MESSAGE,
            ));
        }

        let binary_key = codec::decode_text(secret_key).map_err(|_| {
            warn!("Secret key is not valid base64 or base64url");
            invalid_key_error(InvalidKeyErrorKind::NotBase64, KEY_FORMAT_MESSAGE)
        })?;
        if binary_key.is_empty() {
            return Err(invalid_key_error(
                InvalidKeyErrorKind::Missing,
                KEY_FORMAT_MESSAGE,
            ));
        }

        if binary_key.len() < MIN_KEY_LENGTH {
            return Err(invalid_key_error(
                InvalidKeyErrorKind::TooShort,
                &format!(
                    "expected key length >= {} bytes, got {} bytes",
                    MIN_KEY_LENGTH,
                    binary_key.len()
                ),
            ));
        }

        debug!("Signer created with a {} byte key", binary_key.len());
        Ok(Self {
            binary_key: SecretVec::new(binary_key),
        })
    }

    /// Length of the decoded secret key in bytes.
    pub fn key_len(&self) -> usize {
        self.binary_key.expose_secret().len()
    }

    /// Create and sign a token for a user.
    ///
    /// # Arguments
    ///
    /// * `user_data` - JSON object with `domain`, `id`, `display_name` and optional `groups`
    /// * `extra_headers` - Additional JWT headers; `typ` and `alg` are always overridden
    ///
    /// # Returns
    ///
    /// The token as `header.claims.signature`, each segment unpadded base64url.
    pub fn sign(&self, user_data: &Value, extra_headers: &Record) -> Result<String, Error> {
        let user_data = user_data.as_object().ok_or_else(|| {
            warn!("Rejected non-object user_data");
            signer_error(
                SignerErrorKind::NotARecord,
                "Signer::sign() requires a user_data record",
            )
        })?;
        self.sign_record(user_data, extra_headers)
    }

    /// Create and sign a token for a user record that is already a JSON object.
    pub fn sign_record(&self, user_data: &Record, extra_headers: &Record) -> Result<String, Error> {
        let claims = build_claims(user_data).inspect_err(|e| {
            warn!("Rejected user_data: {e}");
        })?;
        let headers = build_headers(extra_headers);

        let signing_input = format!(
            "{}.{}",
            codec::serialize(&headers)?,
            codec::serialize(&claims)?
        );
        trace!("Signing {} bytes of input", signing_input.len());

        let mut mac = HmacSha256::new_from_slice(self.binary_key.expose_secret())
            .map_err(|_| invalid_key_error(InvalidKeyErrorKind::Rejected, "Invalid HMAC key"))?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!("{}.{}", signing_input, codec::encode_text(signature)))
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Signer")
            .field("binary_key", &"[REDACTED]")
            .finish()
    }
}

/// Validates and renames the user record into the claim set.
fn build_claims(user_data: &Record) -> Result<Record, Error> {
    let mut user_data = user_data.clone();
    claims::retain_fields(&mut user_data, &[REQUIRED_CLAIMS, OPTIONAL_CLAIMS]);
    let claims = claims::map_required(user_data, REQUIRED_CLAIMS, MISSING_REQUIRED_KEY)?;
    let mut claims = claims::map_optional(claims, OPTIONAL_CLAIMS);
    claims.insert("aud".to_string(), Value::String(AUDIENCE.to_string()));

    // `take` leaves the key in place so the mapped groups keep its position
    let groups = match claims.get_mut("g").map(Value::take) {
        Some(Value::Array(groups)) => groups
            .into_iter()
            .enumerate()
            .map(|(index, group)| build_group(index, group))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(signer_error(
                SignerErrorKind::GroupsNotArray,
                "groups must be an Array",
            ))
        }
        None => Vec::new(),
    };
    claims.insert("g".to_string(), Value::Array(groups));

    Ok(claims)
}

fn build_group(index: usize, group: Value) -> Result<Value, Error> {
    let Value::Object(mut group) = group else {
        return Err(signer_error(
            SignerErrorKind::GroupNotRecord,
            &format!("group {} must be an object", index),
        ));
    };

    claims::retain_fields(&mut group, &[REQUIRED_GROUP_CLAIMS]);
    let message = format!("group {} missing required key: %s", index);
    let group = claims::map_required(group, REQUIRED_GROUP_CLAIMS, &message)?;
    Ok(Value::Object(group))
}

fn build_headers(extra_headers: &Record) -> Record {
    let mut headers: Map<String, Value> = extra_headers.clone();
    headers.insert("typ".to_string(), Value::String("JWT".to_string()));
    headers.insert("alg".to_string(), Value::String("HS256".to_string()));
    headers
}
