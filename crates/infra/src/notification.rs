//! # メッセージ送信
//!
//! メニュー通知を 1 受信者へ届けるインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MessageDispatcher` trait で送信手段を抽象化
//! - **2 つの実装**: Slack Incoming Webhook（本番用）、Noop（ローカル実行・通知無効化用）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **リトライしない**: 1 回の呼び出しで 1 回だけ送信し、失敗はそのまま返す

mod noop;
mod slack;

use async_trait::async_trait;
use mealbell_domain::notification::{DeliveryFailure, WebhookMessage};
pub use noop::NoopMessageDispatcher;
pub use slack::SlackWebhookDispatcher;

/// メッセージ送信トレイト
///
/// 1 回の呼び出しで 1 受信者に 1 回だけ送信する。
/// 送信に失敗した場合は診断情報付きの [`DeliveryFailure`] を返す。
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    /// `address` にメッセージを送信する
    async fn dispatch(&self, message: &WebhookMessage, address: &str)
    -> Result<(), DeliveryFailure>;
}
