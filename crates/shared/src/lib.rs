//! # Mealbell 共有ユーティリティ
//!
//! Mealbell の各クレートから使われるログ関連の共通部品を提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - ログのフィールド名は定数として一箇所に集約する
//!
//! ## モジュール構成
//!
//! - [`event_log`] - ビジネスイベントログのマクロとフィールド定数
//! - [`observability`] - トレーシング初期化

pub mod event_log;
pub mod observability;
