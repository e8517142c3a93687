//! The persistent-login token record and its on-disk encoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::result::StoreResult;
use crate::types::uid::Uid;

/// Current version of the persisted record encoding.
const RECORD_VERSION: u8 = 1;

/// One persistent-login token record.
///
/// The `key` field holds the secret validator value (or its hash) that the
/// authentication layer compares against a client-presented credential.
/// Storage never inspects or transforms it. A record's presence does not
/// imply validity: callers must still check [`expiration`] against the
/// current time.
///
/// [`expiration`]: TokenRecord::expiration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Caller-defined user identity.
    pub uid: Uid,
    /// Caller-defined authorization label, opaque to storage.
    pub role: String,
    /// Public, unguessable lookup key.
    pub selector: String,
    /// Secret validator value (or its hash); compared by the caller.
    pub key: String,
    /// Absolute timestamp after which the caller must treat the record
    /// as invalid, even if still physically present.
    pub expiration: DateTime<Utc>,
}

/// Schema-fixed envelope wrapping a record with an explicit version tag.
///
/// The fixed field list and primitive types guarantee that decoding can
/// never instantiate behavior from untrusted bytes.
#[derive(Serialize, Deserialize)]
struct VersionedRecord {
    v: u8,
    #[serde(flatten)]
    record: TokenRecord,
}

impl TokenRecord {
    /// Create a new token record.
    pub fn new(
        uid: impl Into<Uid>,
        role: impl Into<String>,
        selector: impl Into<String>,
        key: impl Into<String>,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            uid: uid.into(),
            role: role.into(),
            selector: selector.into(),
            key: key.into(),
            expiration,
        }
    }

    /// Whether the record's logical expiration has passed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expiration
    }

    /// Serialize the record into its versioned persisted encoding.
    pub fn to_encoded(&self) -> StoreResult<String> {
        let envelope = VersionedRecord {
            v: RECORD_VERSION,
            record: self.clone(),
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Decode a record from its persisted encoding.
    ///
    /// Fails with a `Serialization` error on malformed content or an
    /// unknown version tag. Backends translate that failure into an
    /// "absent" lookup result rather than propagating it.
    pub fn from_encoded(data: &str) -> StoreResult<Self> {
        let envelope: VersionedRecord = serde_json::from_str(data)?;
        if envelope.v != RECORD_VERSION {
            return Err(StoreError::serialization(format!(
                "Unsupported token record version: {}",
                envelope.v
            )));
        }
        Ok(envelope.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> TokenRecord {
        TokenRecord::new(
            42,
            "admin",
            "sel1",
            "abcd1234",
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )
    }

    #[test]
    fn encoded_form_carries_version_and_named_fields() {
        let encoded = sample().to_encoded().unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["v"], 1);
        assert_eq!(value["uid"], 42);
        assert_eq!(value["role"], "admin");
        assert_eq!(value["selector"], "sel1");
        assert_eq!(value["key"], "abcd1234");
        assert!(value["expiration"].is_string());
    }

    #[test]
    fn decoding_returns_every_stored_field() {
        let record = sample();
        let decoded = TokenRecord::from_encoded(&record.to_encoded().unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let encoded = sample().to_encoded().unwrap().replace("\"v\":1", "\"v\":9");
        let err = TokenRecord::from_encoded(&encoded).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Serialization);
    }

    #[test]
    fn malformed_content_is_rejected() {
        assert!(TokenRecord::from_encoded("not json").is_err());
        assert!(TokenRecord::from_encoded("{\"v\":1}").is_err());
    }

    #[test]
    fn expiration_check_is_against_the_given_clock() {
        let record = sample();
        let before = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
        let after = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
        assert!(!record.is_expired(before));
        assert!(record.is_expired(after));
    }
}
