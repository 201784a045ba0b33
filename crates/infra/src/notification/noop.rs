//! Noop 送信実装
//!
//! 実際には送信せず、ログ出力のみ行う。
//! ローカル実行や通知無効化時に使用する。

use async_trait::async_trait;
use mealbell_domain::notification::{DeliveryFailure, WebhookMessage};

use super::MessageDispatcher;

/// Noop 送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopMessageDispatcher;

#[async_trait]
impl MessageDispatcher for NoopMessageDispatcher {
    async fn dispatch(
        &self,
        message: &WebhookMessage,
        address: &str,
    ) -> Result<(), DeliveryFailure> {
        tracing::info!(
            notification.address = %address,
            notification.length = message.text.len(),
            "Noop: Slack メッセージ送信をスキップ"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dispatchがエラーを返さない() {
        let sut = NoopMessageDispatcher;

        let result = sut
            .dispatch(&WebhookMessage::new("Hello!"), "https://hooks.slack.com/x")
            .await;

        assert!(result.is_ok());
    }
}
