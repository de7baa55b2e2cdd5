use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::ids::{ScanId, TokenId, UserId};
use crate::domain::profiles::{NewProfile, Profile, UpdateProfile};
use crate::domain::scans::{NewScan, ScanRecord};
use crate::domain::tokens::{NewToken, Token};

#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// Insert one complete, validated scan. All-or-nothing: on failure
    /// nothing is written and the error carries the store's message.
    async fn insert(&self, scan: NewScan) -> Result<ScanRecord, RepositoryError>;
    async fn get(&self, id: ScanId) -> Result<ScanRecord, RepositoryError>;
    /// Scans for a user, newest first, optionally limited to the N most recent.
    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: Option<i64>,
    ) -> Result<Vec<ScanRecord>, RepositoryError>;

    /// The most recently created scan for a user, if any.
    async fn latest_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<ScanRecord>, RepositoryError> {
        let mut scans = self.list_for_user(user_id, Some(1)).await?;
        Ok(scans.pop())
    }
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn insert(&self, profile: NewProfile) -> Result<Profile, RepositoryError>;
    async fn get(&self, id: UserId) -> Result<Profile, RepositoryError>;
    async fn update(&self, id: UserId, changes: UpdateProfile) -> Result<Profile, RepositoryError>;
    async fn exists(&self) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn insert(&self, token: NewToken) -> Result<Token, RepositoryError>;
    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Token, RepositoryError>;
    async fn update_last_used(&self, id: TokenId) -> Result<(), RepositoryError>;
}
