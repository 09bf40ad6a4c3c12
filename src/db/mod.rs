//! Database Module
//!
//! Embedded SurrealDB: connection setup, schema definitions and seed data.

pub mod models;
pub mod repository;
pub mod seed;

use crate::core::ServerError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database (RocksDB backend) and apply schema
    pub async fn new(db_path: &str) -> Result<Self, ServerError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path).await?;
        db.use_ns("reserva").use_db("reserva").await?;

        apply_schema(&db).await?;
        tracing::info!("Database ready at {}", db_path);

        Ok(Self { db })
    }

    /// Open an in-memory database (tests)
    pub async fn in_memory() -> Result<Self, ServerError> {
        let db: Surreal<Db> = Surreal::new::<Mem>(()).await?;
        db.use_ns("reserva").use_db("test").await?;

        apply_schema(&db).await?;
        Ok(Self { db })
    }
}

/// Apply table and index definitions.
///
/// 唯一索引承担两个约束：
/// - `confirmation_code` 全局唯一 (冲突时重试生成)
/// - `gift_card.code` 全局唯一
async fn apply_schema(db: &Surreal<Db>) -> Result<(), ServerError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS restaurant SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_restaurant_slug ON TABLE restaurant FIELDS slug UNIQUE;

        DEFINE TABLE IF NOT EXISTS booking SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_confirmation_code ON TABLE booking FIELDS confirmation_code UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_booking_slot ON TABLE booking FIELDS restaurant_id, date, time;
        DEFINE INDEX IF NOT EXISTS idx_booking_customer ON TABLE booking FIELDS customer_email;

        DEFINE TABLE IF NOT EXISTS gift_card SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_gift_card_code ON TABLE gift_card FIELDS code UNIQUE;
        "#,
    )
    .await?;
    Ok(())
}
