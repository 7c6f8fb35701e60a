use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::UserIdentityResponse;

/// Incoming payload for password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserIdentityResponse,
    /// Console page the client should open next.
    pub redirect_to: String,
    /// RFC 3339 expiry of the issued token.
    pub expires_at: String,
}

/// Identity of the current caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/me-response.ts"
)]
pub struct MeResponse {
    pub authenticated: bool,
    pub user: UserIdentityResponse,
}
