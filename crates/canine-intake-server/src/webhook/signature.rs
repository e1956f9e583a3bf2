// SPDX-License-Identifier: Apache-2.0

use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    MalformedHeader,
    NoSignatures,
    TimestampOutsideTolerance { skew_secs: u64 },
    Mismatch,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedHeader => f.write_str("signature header is malformed"),
            Self::NoSignatures => f.write_str("signature header has no v1 entries"),
            Self::TimestampOutsideTolerance { skew_secs } => {
                write!(f, "signature timestamp outside tolerance (skew {skew_secs}s)")
            }
            Self::Mismatch => f.write_str("no signature matches the payload"),
        }
    }
}

impl std::error::Error for SignatureError {}

struct ParsedHeader {
    timestamp: u64,
    signatures: Vec<Vec<u8>>,
}

fn parse_header(header: &str) -> Result<ParsedHeader, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| SignatureError::MalformedHeader)?,
                );
            }
            // Entries that are not valid hex can never match; skip them.
            "v1" => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }
    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::NoSignatures);
    }
    Ok(ParsedHeader {
        timestamp,
        signatures,
    })
}

fn mac_for(payload: &[u8], secret: &str, timestamp: u64) -> Option<Hmac<Sha256>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Some(mac)
}

/// Checks a `t=<unix>,v1=<hex>[,v1=<hex>]` header against the raw payload.
///
/// The comparison is constant time; any matching `v1` entry is accepted.
pub fn verify(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: u64,
    now_unix: u64,
) -> Result<u64, SignatureError> {
    let parsed = parse_header(header)?;
    let skew = now_unix.abs_diff(parsed.timestamp);
    if tolerance_secs > 0 && skew > tolerance_secs {
        return Err(SignatureError::TimestampOutsideTolerance { skew_secs: skew });
    }
    let matched = parsed.signatures.iter().any(|candidate| {
        mac_for(payload, secret, parsed.timestamp)
            .is_some_and(|mac| mac.verify_slice(candidate).is_ok())
    });
    if matched {
        Ok(parsed.timestamp)
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Builds a header the way the provider does.
#[must_use]
pub fn sign(payload: &[u8], secret: &str, timestamp: u64) -> Option<String> {
    let digest = mac_for(payload, secret, timestamp)?.finalize().into_bytes();
    Some(format!("t={timestamp},v1={}", hex::encode(digest)))
}
