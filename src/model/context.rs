//! Active business selection
//!
//! A [`BusinessContext`] is resolved from an [`Identity`] in one step and never
//! mutated afterwards. Clients hold it behind an `Arc` and swap the whole value
//! on activation, so either every active field changes or none does.

use crate::error::{AppError, AppResult};
use crate::model::identity::{AccountId, BusinessMembership, Identity, Role};
use pretty_simple_display::DisplaySimple;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The (membership, role) pair subsequent resource calls are scoped to
#[derive(Debug, Clone, PartialEq, DisplaySimple, Serialize, Deserialize)]
pub struct BusinessContext {
    /// Uuid the caller asked for
    pub business_uuid: String,
    /// Numeric id of the selected business
    pub business_id: u64,
    /// Account id used in resource paths
    pub account_id: AccountId,
    /// System id of the matched role
    pub system_id: u64,
    /// Matched role
    pub role: Role,
    /// Matched membership
    pub business_membership: BusinessMembership,
}

impl BusinessContext {
    /// Selects the first membership carrying `business_uuid`, then the first
    /// role granted on that membership's account
    ///
    /// # Errors
    /// * `AppError::BusinessNotFound` if no membership matches
    /// * `AppError::RoleNotFound` if no role matches the membership's account
    /// * `AppError::RoleWithoutSystem` if the matched role has no system id
    pub fn resolve(identity: &Identity, business_uuid: &str) -> AppResult<Self> {
        let membership = identity.require_membership(business_uuid)?;
        let account_id = membership
            .account_id()
            .ok_or_else(|| AppError::BusinessNotFound(business_uuid.to_string()))?;
        let role = identity.require_role(account_id)?;
        let system_id = role
            .systemid
            .ok_or_else(|| AppError::RoleWithoutSystem(account_id.clone()))?;

        debug!(
            "Resolved business {} -> account {}, system {}",
            business_uuid, account_id, system_id
        );

        Ok(Self {
            business_uuid: business_uuid.to_string(),
            business_id: membership.business.id,
            account_id: account_id.clone(),
            system_id,
            role: role.clone(),
            business_membership: membership.clone(),
        })
    }
}
