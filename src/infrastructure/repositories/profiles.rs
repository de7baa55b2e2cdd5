use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, query_as, query_scalar};

use crate::domain::RepositoryError;
use crate::domain::ids::UserId;
use crate::domain::profiles::{NewProfile, Profile, UpdateProfile};
use crate::domain::repositories::ProfileRepository;
use crate::infrastructure::database::DatabasePool;
use crate::infrastructure::repositories::macros::push_update_field;

#[derive(Clone)]
pub struct SqlProfileRepository {
    pool: DatabasePool,
}

impl SqlProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_domain(row: ProfileRow) -> Profile {
        Profile {
            id: UserId::from(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            favorite_genre: row.favorite_genre,
            school_grade: row.school_grade,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProfileRepository for SqlProfileRepository {
    async fn insert(&self, profile: NewProfile) -> Result<Profile, RepositoryError> {
        let profile = profile.normalize();

        let row = query_as::<_, ProfileRow>(
            "INSERT INTO profiles (first_name, last_name, favorite_genre, school_grade, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, first_name, last_name, favorite_genre, school_grade, updated_at",
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.favorite_genre)
        .bind(&profile.school_grade)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(Self::into_domain(row))
    }

    async fn get(&self, id: UserId) -> Result<Profile, RepositoryError> {
        let row = query_as::<_, ProfileRow>(
            "SELECT id, first_name, last_name, favorite_genre, school_grade, updated_at \
             FROM profiles WHERE id = ?",
        )
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        match row {
            Some(row) => Ok(Self::into_domain(row)),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn update(&self, id: UserId, changes: UpdateProfile) -> Result<Profile, RepositoryError> {
        let mut builder = QueryBuilder::new("UPDATE profiles SET ");
        let mut sep = false;

        push_update_field!(builder, sep, "first_name", changes.first_name);
        push_update_field!(builder, sep, "last_name", changes.last_name);
        push_update_field!(builder, sep, "favorite_genre", changes.favorite_genre);
        push_update_field!(builder, sep, "school_grade", changes.school_grade);

        if !sep {
            return Err(RepositoryError::unexpected(
                "No fields provided for update".to_string(),
            ));
        }

        builder.push(", updated_at = ");
        builder.push_bind(Utc::now());
        builder.push(" WHERE id = ");
        builder.push_bind(i64::from(id));

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await
    }

    async fn exists(&self) -> Result<bool, RepositoryError> {
        query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM profiles)")
            .fetch_one(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    first_name: String,
    last_name: String,
    favorite_genre: Option<String>,
    school_grade: Option<String>,
    updated_at: DateTime<Utc>,
}
