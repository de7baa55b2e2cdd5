use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::query_as;

use crate::domain::RepositoryError;
use crate::domain::ids::{ScanId, UserId};
use crate::domain::repositories::ScanRepository;
use crate::domain::scans::{NewScan, Recommendation, ScanRecord};
use crate::infrastructure::database::DatabasePool;

const SCAN_COLUMNS: &str = "id, user_id, title, author, genre, reading_level, maturity_level, \
     is_movie, recommendations, ai_analysis, image_url, created_at";

#[derive(Clone)]
pub struct SqlScanRepository {
    pool: DatabasePool,
}

impl SqlScanRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_domain(row: ScanRow) -> Result<ScanRecord, RepositoryError> {
        let recommendations: Vec<Recommendation> = serde_json::from_str(&row.recommendations)
            .map_err(|err| {
                RepositoryError::unexpected(format!(
                    "stored recommendations are not valid JSON: {err}"
                ))
            })?;

        Ok(ScanRecord {
            id: ScanId::from(row.id),
            user_id: UserId::from(row.user_id),
            title: row.title,
            author: row.author,
            genre: row.genre,
            reading_level: row.reading_level,
            maturity_level: row.maturity_level,
            is_movie: row.is_movie,
            recommendations,
            ai_analysis: row.ai_analysis,
            image_url: row.image_url,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ScanRepository for SqlScanRepository {
    async fn insert(&self, scan: NewScan) -> Result<ScanRecord, RepositoryError> {
        let analysis = scan.analysis;
        let recommendations = serde_json::to_string(&analysis.recommendations).map_err(|err| {
            RepositoryError::unexpected(format!("failed to encode recommendations: {err}"))
        })?;

        let row = query_as::<_, ScanRow>(&format!(
            "INSERT INTO book_scans (user_id, title, author, genre, reading_level, \
             maturity_level, is_movie, recommendations, ai_analysis, image_url, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {SCAN_COLUMNS}"
        ))
        .bind(i64::from(scan.user_id))
        .bind(&analysis.title)
        .bind(&analysis.author)
        .bind(&analysis.genre)
        .bind(&analysis.reading_level)
        .bind(&analysis.maturity_level)
        .bind(analysis.is_movie)
        .bind(&recommendations)
        .bind(&analysis.summary)
        .bind(&scan.image_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Self::into_domain(row)
    }

    async fn get(&self, id: ScanId) -> Result<ScanRecord, RepositoryError> {
        let row = query_as::<_, ScanRow>(&format!(
            "SELECT {SCAN_COLUMNS} FROM book_scans WHERE id = ?"
        ))
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        match row {
            Some(row) => Self::into_domain(row),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: Option<i64>,
    ) -> Result<Vec<ScanRecord>, RepositoryError> {
        let mut sql = format!(
            "SELECT {SCAN_COLUMNS} FROM book_scans WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC"
        );
        if limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut query = query_as::<_, ScanRow>(&sql).bind(i64::from(user_id));
        if let Some(limit) = limit {
            query = query.bind(limit);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        rows.into_iter().map(Self::into_domain).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ScanRow {
    id: i64,
    user_id: i64,
    title: String,
    author: String,
    genre: String,
    reading_level: String,
    maturity_level: String,
    is_movie: bool,
    recommendations: String,
    ai_analysis: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}
