use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};

use crate::domain::RepositoryError;
use crate::domain::ids::{TokenId, UserId};
use crate::domain::repositories::TokenRepository;
use crate::domain::tokens::{NewToken, Token};
use crate::infrastructure::database::DatabasePool;

#[derive(Clone)]
pub struct SqlTokenRepository {
    pool: DatabasePool,
}

impl SqlTokenRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_domain(row: TokenRow) -> Token {
        Token {
            id: TokenId::from(row.id),
            user_id: UserId::from(row.user_id),
            token_hash: row.token_hash,
            name: row.name,
            created_at: row.created_at,
            last_used_at: row.last_used_at,
        }
    }
}

#[async_trait]
impl TokenRepository for SqlTokenRepository {
    async fn insert(&self, token: NewToken) -> Result<Token, RepositoryError> {
        let row = query_as::<_, TokenRow>(
            "INSERT INTO tokens (user_id, token_hash, name, created_at) \
             VALUES (?, ?, ?, ?) \
             RETURNING id, user_id, token_hash, name, created_at, last_used_at",
        )
        .bind(i64::from(token.user_id))
        .bind(&token.token_hash)
        .bind(&token.name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err
                && db_err.is_unique_violation()
            {
                return RepositoryError::conflict("A token with this value already exists");
            }
            RepositoryError::unexpected(err.to_string())
        })?;

        Ok(Self::into_domain(row))
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Token, RepositoryError> {
        let row = query_as::<_, TokenRow>(
            "SELECT id, user_id, token_hash, name, created_at, last_used_at \
             FROM tokens WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        match row {
            Some(row) => Ok(Self::into_domain(row)),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn update_last_used(&self, id: TokenId) -> Result<(), RepositoryError> {
        query("UPDATE tokens SET last_used_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    id: i64,
    user_id: i64,
    token_hash: String,
    name: String,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}
