use crate::config::DatabaseConfig;
use crate::db::error::DatabaseError;
use crate::db::models::{
    Artwork, ArtworkPatch, ArtworkRow, Category, Exhibit, ExhibitRow, NewArtwork,
    NewTimelineEvent, Setting, SettingRow, TimelineEvent, TimelineEventPatch, TimelineEventRow,
};
use crate::db::store::{ArtworkStore, ExhibitStore, SettingsStore, TimelineStore};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, QueryBuilder};
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS artworks (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        artist TEXT NOT NULL,
        year INTEGER,
        medium TEXT,
        dimensions TEXT,
        description TEXT,
        category TEXT,
        price TEXT,
        image_url TEXT,
        image_path TEXT,
        featured BOOLEAN NOT NULL DEFAULT FALSE,
        artwork_number INTEGER,
        user_id UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS artworks_created_at_idx ON artworks (created_at)",
    "CREATE INDEX IF NOT EXISTS artworks_user_id_idx ON artworks (user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS exhibits (
        id UUID PRIMARY KEY,
        image_url TEXT NOT NULL,
        image_path TEXT NOT NULL,
        order_index INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS timeline_events (
        id UUID PRIMARY KEY,
        time TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        "order" INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        image_url TEXT,
        image_path TEXT,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        user_id UUID
    )
    "#,
];

/// PostgreSQL implementation of the entity stores.
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    /// Connect lazily and probe connectivity once.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(60))
            .connect_lazy(&config.url)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                DatabaseError::Connection(e.to_string())
            })?;

        if let Err(e) = sqlx::query("SELECT 1").execute(&pool).await {
            error!("Database connectivity test failed: {}", e);
            return Err(DatabaseError::Connection(format!(
                "Database is not accessible: {}",
                e
            )));
        }

        info!("PostgreSQL database connection established successfully");
        Ok(PostgresDatabase { pool })
    }

    /// Create the portfolio tables when they do not exist yet.
    pub async fn init_schema(&self) -> Result<(), DatabaseError> {
        info!("Initializing portfolio schema");
        for statement in SCHEMA_STATEMENTS {
            debug!("Executing schema statement");
            sqlx::query(statement).execute(&self.pool).await.map_err(|e| {
                error!("Schema statement failed: {}", e);
                DatabaseError::Query(format!("Failed to initialize schema: {}", e))
            })?;
        }
        info!("Schema initialization completed successfully");
        Ok(())
    }

    async fn fetch_artworks(&self, query: &str) -> Result<Vec<Artwork>, DatabaseError> {
        let rows = sqlx::query_as::<_, ArtworkRow>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Artwork query failed: {}", e);
                DatabaseError::Query(e.to_string())
            })?;
        debug!("Artwork query returned {} rows", rows.len());
        Ok(rows.into_iter().map(Artwork::from).collect())
    }
}

#[async_trait]
impl ArtworkStore for PostgresDatabase {
    async fn list(&self) -> Result<Vec<Artwork>, DatabaseError> {
        self.fetch_artworks("SELECT * FROM artworks ORDER BY created_at DESC")
            .await
    }

    async fn list_featured(&self) -> Result<Vec<Artwork>, DatabaseError> {
        self.fetch_artworks(
            "SELECT * FROM artworks WHERE featured \
             ORDER BY artwork_number ASC NULLS LAST, created_at DESC",
        )
        .await
    }

    async fn list_by_category(&self, category: Category) -> Result<Vec<Artwork>, DatabaseError> {
        let rows = sqlx::query_as::<_, ArtworkRow>(
            "SELECT * FROM artworks WHERE category = $1 ORDER BY created_at DESC",
        )
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Artwork category query failed: {}", e);
            DatabaseError::Query(e.to_string())
        })?;
        Ok(rows.into_iter().map(Artwork::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Artwork, DatabaseError> {
        let row = sqlx::query_as::<_, ArtworkRow>("SELECT * FROM artworks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        row.map(Artwork::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("artwork {}", id)))
    }

    async fn insert(&self, owner: Uuid, artwork: NewArtwork) -> Result<Uuid, DatabaseError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO artworks
                (id, title, artist, year, medium, dimensions, description,
                 category, price, image_url, image_path, featured,
                 artwork_number, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(id)
        .bind(&artwork.title)
        .bind(&artwork.artist)
        .bind(artwork.year)
        .bind(&artwork.medium)
        .bind(&artwork.dimensions)
        .bind(&artwork.description)
        .bind(artwork.category.map(|c| c.as_str().to_string()))
        .bind(&artwork.price)
        .bind(&artwork.image_url)
        .bind(&artwork.image_path)
        .bind(artwork.featured)
        .bind(artwork.artwork_number)
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert artwork: {}", e);
            DatabaseError::Query(e.to_string())
        })?;

        debug!("Inserted artwork {}", id);
        Ok(id)
    }

    async fn update(&self, id: Uuid, patch: ArtworkPatch) -> Result<(), DatabaseError> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut qb: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("UPDATE artworks SET updated_at = now()");

        if let Some(title) = patch.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(artist) = patch.artist {
            qb.push(", artist = ").push_bind(artist);
        }
        if let Some(year) = patch.year {
            qb.push(", year = ").push_bind(year);
        }
        if let Some(medium) = patch.medium {
            qb.push(", medium = ").push_bind(medium);
        }
        if let Some(dimensions) = patch.dimensions {
            qb.push(", dimensions = ").push_bind(dimensions);
        }
        if let Some(description) = patch.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(category) = patch.category {
            qb.push(", category = ").push_bind(category.as_str().to_string());
        }
        if let Some(price) = patch.price {
            qb.push(", price = ").push_bind(price);
        }
        if let Some(image_url) = patch.image_url {
            qb.push(", image_url = ").push_bind(image_url);
        }
        if let Some(image_path) = patch.image_path {
            qb.push(", image_path = ").push_bind(image_path);
        }
        if let Some(featured) = patch.featured {
            qb.push(", featured = ").push_bind(featured);
        }
        if let Some(artwork_number) = patch.artwork_number {
            qb.push(", artwork_number = ").push_bind(artwork_number);
        }

        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await.map_err(|e| {
            error!("Failed to update artwork {}: {}", id, e);
            DatabaseError::Query(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("artwork {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM artworks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete artwork {}: {}", id, e);
                DatabaseError::Query(e.to_string())
            })?;
        Ok(())
    }

    async fn delete_all_owned(&self, owner: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM artworks WHERE user_id = $1")
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete artworks for {}: {}", owner, e);
                DatabaseError::Query(e.to_string())
            })?;
        info!(
            "Deleted {} artworks owned by {}",
            result.rows_affected(),
            owner
        );
        Ok(())
    }
}

#[async_trait]
impl ExhibitStore for PostgresDatabase {
    async fn list(&self) -> Result<Vec<Exhibit>, DatabaseError> {
        let rows = sqlx::query_as::<_, ExhibitRow>(
            "SELECT * FROM exhibits ORDER BY order_index ASC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(rows.into_iter().map(Exhibit::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Exhibit, DatabaseError> {
        let row = sqlx::query_as::<_, ExhibitRow>("SELECT * FROM exhibits WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        row.map(Exhibit::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("exhibit {}", id)))
    }

    async fn insert(
        &self,
        image_url: String,
        image_path: String,
        order_index: i32,
    ) -> Result<Uuid, DatabaseError> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO exhibits (id, image_url, image_path, order_index) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(image_url)
        .bind(image_path)
        .bind(order_index)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert exhibit: {}", e);
            DatabaseError::Query(e.to_string())
        })?;
        Ok(id)
    }

    async fn update_image(
        &self,
        id: Uuid,
        image_url: String,
        image_path: String,
    ) -> Result<(), DatabaseError> {
        let result =
            sqlx::query("UPDATE exhibits SET image_url = $2, image_path = $3 WHERE id = $1")
                .bind(id)
                .bind(image_url)
                .bind(image_path)
                .execute(&self.pool)
                .await
                .map_err(|e| DatabaseError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("exhibit {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM exhibits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl TimelineStore for PostgresDatabase {
    async fn list(&self) -> Result<Vec<TimelineEvent>, DatabaseError> {
        let rows = sqlx::query_as::<_, TimelineEventRow>(
            r#"SELECT * FROM timeline_events ORDER BY "order" ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(rows.into_iter().map(TimelineEvent::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<TimelineEvent, DatabaseError> {
        let row =
            sqlx::query_as::<_, TimelineEventRow>("SELECT * FROM timeline_events WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DatabaseError::Query(e.to_string()))?;

        row.map(TimelineEvent::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("timeline event {}", id)))
    }

    async fn insert(&self, event: NewTimelineEvent) -> Result<Uuid, DatabaseError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO timeline_events (id, time, title, description, "order")
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(id)
        .bind(event.time)
        .bind(event.title)
        .bind(event.description)
        .bind(event.order)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert timeline event: {}", e);
            DatabaseError::Query(e.to_string())
        })?;
        Ok(id)
    }

    async fn update(&self, id: Uuid, patch: TimelineEventPatch) -> Result<(), DatabaseError> {
        if patch.time.is_none()
            && patch.title.is_none()
            && patch.description.is_none()
            && patch.order.is_none()
        {
            return Ok(());
        }

        let mut qb: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("UPDATE timeline_events SET id = id");

        if let Some(time) = patch.time {
            qb.push(", time = ").push_bind(time);
        }
        if let Some(title) = patch.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = patch.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(order) = patch.order {
            qb.push(r#", "order" = "#).push_bind(order);
        }

        qb.push(" WHERE id = ").push_bind(id);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("timeline event {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM timeline_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for PostgresDatabase {
    async fn get(&self, key: &str) -> Result<Option<Setting>, DatabaseError> {
        let row = sqlx::query_as::<_, SettingRow>("SELECT * FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(row.map(Setting::from))
    }

    async fn upsert(&self, setting: Setting) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, image_url, image_path, updated_at, user_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (key) DO UPDATE SET
                image_url = EXCLUDED.image_url,
                image_path = EXCLUDED.image_path,
                updated_at = EXCLUDED.updated_at,
                user_id = EXCLUDED.user_id
            "#,
        )
        .bind(&setting.key)
        .bind(&setting.image_url)
        .bind(&setting.image_path)
        .bind(Utc::now())
        .bind(setting.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to upsert setting {}: {}", setting.key, e);
            DatabaseError::Query(e.to_string())
        })?;
        Ok(())
    }
}
