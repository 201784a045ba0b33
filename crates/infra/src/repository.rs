//! # リポジトリ実装
//!
//! メニューと注文の永続化を担う trait と PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケース層は trait にのみ依存する
//! - **事前ロード**: 関連エンティティは取得時にまとめて解決し、遅延ロードを持ち込まない
//! - **テスタビリティ**: trait 経由でインメモリ実装に差し替え可能

pub mod menu_repository;
pub mod order_repository;

pub use menu_repository::{MenuRepository, PostgresMenuRepository};
pub use order_repository::{OrderRepository, PostgresOrderRepository};
