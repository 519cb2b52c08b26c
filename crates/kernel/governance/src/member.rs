//! Member and user identities and the stored member record.

use conclave_kernel_store::{ConvertError, Converter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a governance member.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identity of an application user governed by member proposals.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Raw UTF-8 key converter for member ids.
pub struct MemberIdConverter;

impl Converter for MemberIdConverter {
    type Value = MemberId;

    fn encode(value: &MemberId) -> Result<Vec<u8>, ConvertError> {
        Ok(value.0.as_bytes().to_vec())
    }

    fn decode(bytes: &[u8]) -> Result<MemberId, ConvertError> {
        std::str::from_utf8(bytes)
            .map(MemberId::new)
            .map_err(|err| ConvertError::new(format!("member id is not utf-8: {err}")))
    }
}

/// Raw UTF-8 key converter for user ids.
pub struct UserIdConverter;

impl Converter for UserIdConverter {
    type Value = UserId;

    fn encode(value: &UserId) -> Result<Vec<u8>, ConvertError> {
        Ok(value.0.as_bytes().to_vec())
    }

    fn decode(bytes: &[u8]) -> Result<UserId, ConvertError> {
        std::str::from_utf8(bytes)
            .map(UserId::new)
            .map_err(|err| ConvertError::new(format!("user id is not utf-8: {err}")))
    }
}

/// Lifecycle status of a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MemberStatus {
    /// Admitted but not yet active.
    Accepted,
    /// Participating: may submit proposals, cast ballots, and withdraw.
    #[default]
    Active,
    /// No longer participating.
    Retired,
}

/// Stored record for one member.
///
/// The resolution engine reads only `is_operator`; the lifecycle layer
/// additionally gates submission, balloting, and withdrawal on `status`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub is_operator: bool,
}

impl MemberInfo {
    /// An active non-operator member.
    pub fn active() -> Self {
        Self {
            status: MemberStatus::Active,
            is_operator: false,
        }
    }

    /// An active operator member.
    pub fn operator() -> Self {
        Self {
            status: MemberStatus::Active,
            is_operator: true,
        }
    }

    pub fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, MemberStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_converter_round_trip() {
        let id = MemberId::new("m1");
        let encoded = MemberIdConverter::encode(&id).unwrap();
        assert_eq!(encoded, b"m1");
        assert_eq!(MemberIdConverter::decode(&encoded).unwrap(), id);
    }

    #[test]
    fn missing_record_fields_default_to_active_non_operator() {
        let info: MemberInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(info.status, MemberStatus::Active);
        assert!(!info.is_operator);
    }

    #[test]
    fn operator_record_is_active() {
        let info = MemberInfo::operator();
        assert!(info.is_active());
        assert!(info.is_operator);

        let retired = MemberInfo::operator().with_status(MemberStatus::Retired);
        assert!(!retired.is_active());
    }
}
