//! Authenticated user model
//!
//! Built from the `users/me` endpoint. Only the fields the client needs to
//! resolve an active business are typed; everything else in the payload is
//! ignored.

use crate::error::{AppError, AppResult};
use crate::model::responses::unwrap_envelope;
use pretty_simple_display::DisplaySimple;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Account identifier shared by businesses and roles
///
/// FreshBooks returns account ids as short strings, but older payloads and
/// test fixtures use integers. Both deserialize into the same decimal or
/// textual form so memberships and roles compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Creates an account id from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as it appears in request paths
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for AccountId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AccountIdVisitor;

        impl Visitor<'_> for AccountIdVisitor {
            type Value = AccountId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer account id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<AccountId, E> {
                Ok(AccountId::new(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<AccountId, E> {
                Ok(AccountId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<AccountId, E> {
                Ok(AccountId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<AccountId, E> {
                Ok(AccountId(v.to_string()))
            }
        }

        deserializer.deserialize_any(AccountIdVisitor)
    }
}

/// Business referenced by a membership
#[derive(Debug, Clone, PartialEq, DisplaySimple, Serialize, Deserialize)]
pub struct Business {
    /// Numeric business id
    pub id: u64,
    /// Business uuid used to select the active business
    #[serde(default)]
    pub business_uuid: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Accounting account the business lives in, absent for some legacy businesses
    #[serde(default)]
    pub account_id: Option<AccountId>,
}

/// Association between the user and a business
#[derive(Debug, Clone, PartialEq, DisplaySimple, Serialize, Deserialize)]
pub struct BusinessMembership {
    /// Membership id
    #[serde(default)]
    pub id: Option<u64>,
    /// Role name of the user inside the business (owner, employee, ...)
    #[serde(default)]
    pub role: Option<String>,
    /// The business itself
    pub business: Business,
}

impl BusinessMembership {
    /// True when the nested business carries the given uuid
    #[must_use]
    pub fn matches_uuid(&self, business_uuid: &str) -> bool {
        self.business.business_uuid.as_deref() == Some(business_uuid)
    }

    /// Account id of the nested business
    #[must_use]
    pub fn account_id(&self) -> Option<&AccountId> {
        self.business.account_id.as_ref()
    }
}

/// Access grant tying an account to a system
#[derive(Debug, Clone, PartialEq, DisplaySimple, Serialize, Deserialize)]
pub struct Role {
    /// Role id
    #[serde(default)]
    pub id: Option<u64>,
    /// Role name
    #[serde(default)]
    pub role: Option<String>,
    /// System the role belongs to
    #[serde(default)]
    pub systemid: Option<u64>,
    /// User the role is granted to
    #[serde(default)]
    pub userid: Option<u64>,
    /// Account the role grants access to
    #[serde(default)]
    pub accountid: Option<AccountId>,
}

/// The authenticated user
#[derive(Debug, Clone, PartialEq, DisplaySimple, Serialize, Deserialize)]
pub struct Identity {
    /// Identity id
    pub id: u64,
    /// Login email
    pub email: String,
    /// First name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Memberships in list order as returned by the API
    #[serde(default)]
    pub business_memberships: Vec<BusinessMembership>,
    /// Roles in list order as returned by the API
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Identity {
    /// Builds an identity from a full `{"response": {...}}` body
    ///
    /// # Errors
    /// * `AppError::MissingField` if the envelope is absent
    /// * `AppError::Json` if the payload does not describe a user
    pub fn from_response(body: Value) -> AppResult<Self> {
        let result = unwrap_envelope(body)?;
        Ok(serde_json::from_value(result)?)
    }

    /// First membership whose business carries `business_uuid` and an account id
    #[must_use]
    pub fn find_membership(&self, business_uuid: &str) -> Option<&BusinessMembership> {
        self.business_memberships
            .iter()
            .find(|bm| bm.matches_uuid(business_uuid) && bm.account_id().is_some())
    }

    /// First role granted on `account_id`
    #[must_use]
    pub fn find_role(&self, account_id: &AccountId) -> Option<&Role> {
        self.roles
            .iter()
            .find(|role| role.accountid.as_ref() == Some(account_id))
    }

    /// First and last name joined with a space, skipping missing parts
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Uuids of every business the user belongs to, in list order
    #[must_use]
    pub fn business_uuids(&self) -> Vec<&str> {
        self.business_memberships
            .iter()
            .filter_map(|bm| bm.business.business_uuid.as_deref())
            .collect()
    }

    /// Looks up a membership, failing with a typed error when none matches
    pub(crate) fn require_membership(&self, business_uuid: &str) -> AppResult<&BusinessMembership> {
        self.find_membership(business_uuid)
            .ok_or_else(|| AppError::BusinessNotFound(business_uuid.to_string()))
    }

    /// Looks up a role, failing with a typed error when none matches
    pub(crate) fn require_role(&self, account_id: &AccountId) -> AppResult<&Role> {
        self.find_role(account_id)
            .ok_or_else(|| AppError::RoleNotFound(account_id.clone()))
    }
}
