//! # Mealbell インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理とマイグレーション
//! - **リポジトリ実装**: メニュー参照（注文・従業員を事前ロード）
//! - **メッセージ送信**: Slack Incoming Webhook への POST
//!
//! ## 依存関係
//!
//! ```text
//! notifier → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - Webhook メッセージ送信
//! - [`repository`] - リポジトリ実装
//! - `mock` - テスト用インメモリ実装（`test-utils` feature）

pub mod db;
pub mod error;
pub mod notification;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::InfraError;
