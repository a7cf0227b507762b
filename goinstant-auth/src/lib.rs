//! # goinstant-auth
//!
//! Issues signed identity tokens for the GoInstant platform:
//! - Compact base64url codec for token segments and secret keys
//! - Claim mapping from caller-facing user and group fields to wire claim names
//! - HS256 signing of the header and claim set with the application's secret key
//!
//! ## Usage
//!
//! ```rust,ignore
//! use goinstant_auth::Signer;
//! use serde_json::{json, Map};
//!
//! let signer = Signer::new("HKYdFdnezle2yrI2_Ph3cHz144bISk-cvuAbeAAA999")?;
//! let token = signer.sign(
//!     &json!({ "domain": "example.com", "id": "bar", "display_name": "bob" }),
//!     &Map::new(),
//! )?;
//! ```

pub mod claims;
pub mod codec;
pub mod error;
pub mod signer;

// Re-export commonly used types
pub use claims::Record;
pub use codec::{decode_text, deserialize, encode_text, serialize};
pub use error::{Error, ErrorKind};
pub use signer::Signer;
