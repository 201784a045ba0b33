//! Slack Incoming Webhook 送信実装
//!
//! reqwest で `{"text": ...}` を JSON として POST する。
//! 2xx 以外のレスポンスと通信エラーはどちらも [`DeliveryFailure`] に正規化する。

use std::time::Duration;

use async_trait::async_trait;
use mealbell_domain::notification::{DeliveryFailure, RequestSnapshot, WebhookMessage};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use super::MessageDispatcher;
use crate::error::InfraError;

/// Slack Incoming Webhook 送信
///
/// 1 回の送信ごとのタイムアウトはクライアント生成時に固定する。
#[derive(Debug, Clone)]
pub struct SlackWebhookDispatcher {
    client: reqwest::Client,
}

impl SlackWebhookDispatcher {
    /// 新しい送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `timeout`: 1 回の POST のタイムアウト（接続から本文受信まで）
    pub fn new(timeout: Duration) -> Result<Self, InfraError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn request_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

fn snapshot(address: &str, headers: &HeaderMap, body: &str) -> RequestSnapshot {
    RequestSnapshot {
        address: address.to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body:    body.to_string(),
    }
}

#[async_trait]
impl MessageDispatcher for SlackWebhookDispatcher {
    #[tracing::instrument(skip_all, level = "debug", fields(notification.address = %address))]
    async fn dispatch(
        &self,
        message: &WebhookMessage,
        address: &str,
    ) -> Result<(), DeliveryFailure> {
        let headers = Self::request_headers();
        let body = match serde_json::to_string(message) {
            Ok(body) => body,
            Err(e) => {
                return Err(DeliveryFailure::transport(
                    format!("本文のシリアライズに失敗: {e}"),
                    snapshot(address, &headers, ""),
                ));
            }
        };
        let request = snapshot(address, &headers, &body);

        let response = match self
            .client
            .post(address)
            .headers(headers)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Err(DeliveryFailure::transport(e.to_string(), request)),
        };

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Slack メッセージ送信成功");
            Ok(())
        } else {
            Err(DeliveryFailure::rejected(status.as_u16(), request))
        }
    }
}
