//! Native resume token helpers
//!
//! Stores encode their resume position as URL-safe base64 JSON. The
//! alphabet includes `_` and `-`, so tokens routinely carry characters the
//! cursor codec has to escape.

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a resume position into an opaque token
pub fn encode_token<T: Serialize>(position: &T) -> Result<String> {
    let json = serde_json::to_vec(position)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Parse a token issued for `partition`
///
/// Any decoding failure is reported as an invalid token for that partition.
pub fn decode_token<T: DeserializeOwned>(partition: &str, token: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| Error::invalid_token(partition, format!("not base64: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::invalid_token(partition, format!("unrecognised position: {e}")))
}

/// Reject a token whose embedded partition differs from the queried one
pub fn ensure_bound(partition: &str, bound_to: &str) -> Result<()> {
    if partition == bound_to {
        Ok(())
    } else {
        Err(Error::invalid_token(
            partition,
            format!("token was issued for partition {bound_to}"),
        ))
    }
}
