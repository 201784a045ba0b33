//! # PostgreSQL データベース接続管理
//!
//! 接続プールの作成とマイグレーションの適用を行う。
//!
//! ```rust,ignore
//! use mealbell_infra::db;
//!
//! let pool = db::create_pool("postgres://localhost/mealbell").await?;
//! db::run_migrations(&pool).await?;
//! ```

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::error::InfraError;

/// PostgreSQL 接続プールを作成する
///
/// アプリケーション起動時に一度だけ呼び出し、作成したプールを共有する。
/// 通知ジョブは読み取り中心のため接続数は小さく抑える。
pub async fn create_pool(database_url: &str) -> Result<PgPool, InfraError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// データベースマイグレーションを実行する
///
/// `migrations/` 配下の SQL をバイナリに埋め込み、未適用のものだけを順に適用する。
pub async fn run_migrations(pool: &PgPool) -> Result<(), InfraError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| InfraError::unexpected(format!("マイグレーションに失敗: {e}")))
}
