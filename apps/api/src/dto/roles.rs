use serde::{Deserialize, Serialize};
use ts_rs::TS;
use vitrine_application::RoleDefinition;

/// Incoming payload for role creation and rename.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-role-request.ts"
)]
pub struct SaveRoleRequest {
    pub name: String,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub is_system: bool,
}

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            id: value.role_id.to_string(),
            name: value.name,
            is_system: value.is_system,
        }
    }
}
