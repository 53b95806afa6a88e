use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in user, as supplied by the session adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
}
