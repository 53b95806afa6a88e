// Session Adapter: who is signed in. Injected into the app state; there is no global session.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::user::Identity;

#[async_trait]
pub trait SessionAdapter: Send + Sync {
    async fn current_user(&self) -> Option<Identity>;

    async fn sign_out(&self);
}

/// Session seeded once at startup (from `SESSION_USER_ID` / `SESSION_USER_EMAIL`).
pub struct ConfiguredSession {
    user: RwLock<Option<Identity>>,
}

impl ConfiguredSession {
    pub fn new(user: Option<Identity>) -> Self {
        Self {
            user: RwLock::new(user),
        }
    }
}

#[async_trait]
impl SessionAdapter for ConfiguredSession {
    async fn current_user(&self) -> Option<Identity> {
        self.user.read().await.clone()
    }

    async fn sign_out(&self) {
        if let Some(user) = self.user.write().await.take() {
            info!(user_id = %user.id, "Signed out");
        }
    }
}
