//! The signed-in user as persisted by the storefront.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// The "current user" record kept in client-side session storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CurrentUser {
    /// A user known only by id.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            name: None,
            email: None,
        }
    }
}
