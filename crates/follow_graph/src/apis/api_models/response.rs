use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct FollowStatusResponse {
    pub following: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct UnfollowResponse {
    /// False when there was no edge to remove.
    pub removed: bool,
}
