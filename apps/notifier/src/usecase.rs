//! # ユースケース層
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・送信手段・時計を `Arc<dyn Trait>` で外部から注入
//! - **起動方法からの独立**: CLI・バックグラウンドタスクのどちらからも同じ API を呼ぶ
//!
//! ## モジュール構成
//!
//! - `menu`: メニュー公開と公開済みメニューの参照
//! - `notification`: メニュー通知ジョブ
//! - `order`: 注文登録

pub mod menu;
pub mod notification;
pub mod order;

pub use menu::{PublishMenuUseCase, PublishOutcome, PublishedMenuQuery};
pub use notification::{MenuNotificationJob, NotificationTrigger};
pub use order::PlaceOrderUseCase;
