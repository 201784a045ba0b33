//! # Mealbell ドメイン層
//!
//! 社食メニューの通知に必要なドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **読み取り専用の射影**: メニュー・注文・従業員は永続化層が所有し、
//!   このクレートは通知処理に必要な形だけを表現する
//! - **事前ロード前提**: 注文は従業員と国籍コードが解決済みの状態で渡される
//! - **インフラ非依存**: DB や HTTP には一切依存しない
//!
//! ## 依存関係の方向
//!
//! ```text
//! notifier → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`clock`] - 現在時刻の提供（テストで固定可能）
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`menu`] - メニュー、メニューオプション、注文、従業員
//! - [`notification`] - Webhook メッセージと配信失敗
//! - [`order`] - 注文の登録と受付締切
//!
//! ## 使用例
//!
//! ```rust
//! use mealbell_domain::{DomainError, menu::MenuId};
//!
//! let menu_id = MenuId::new();
//!
//! let error = DomainError::NotFound {
//!     entity_type: "Menu",
//!     id:          menu_id.to_string(),
//! };
//! assert!(error.to_string().contains("Menu"));
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod menu;
pub mod notification;
pub mod order;

pub use error::DomainError;
