//! # 通知
//!
//! Slack Incoming Webhook によるメニュー通知のドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`WebhookMessage`] | ダイジェスト | メニューを要約した送信本文 |
//! | [`DeliveryFailure`] | 配信失敗 | 1 受信者への送信が失敗したことと、その診断情報 |
//! | [`NotificationOutcome`] | 通知結果 | 受信者ごとの結果。ログ出力にのみ使う |
//!
//! ## 設計方針
//!
//! - **結果型による失敗表現**: 配信失敗は例外ではなく `Result` の `Err` で返し、
//!   ジョブ側は受信者ごとに結果を確認して次へ進む
//! - **トランスポートエラーの正規化**: 接続失敗・タイムアウトも [`DeliveryFailure`] に
//!   まとめ、ステータスコード起因の失敗と同じ扱いにする
//! - **レスポンス本文は保持しない**: 診断にはリクエスト側の情報のみ使う

use derive_more::Display;
use serde::Serialize;
use thiserror::Error;

/// 通知処理のエラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// Webhook に送るメッセージ
///
/// `{"text": "..."}` の JSON としてシリアライズされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookMessage {
    pub text: String,
}

impl WebhookMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// 送信したリクエストの控え
///
/// 配信失敗時の診断ログに使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    /// 送信先（Webhook URL）
    pub address: String,
    /// 送信したヘッダー（名前, 値）
    pub headers: Vec<(String, String)>,
    /// 送信した本文
    pub body:    String,
}

/// 配信失敗の種別
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DeliveryFailureKind {
    /// 2xx 以外のステータスを受信した
    #[display("HTTP {status} を受信")]
    Rejected { status: u16 },

    /// 接続失敗、タイムアウト、URL 不正などでレスポンスを得られなかった
    #[display("通信エラー: {reason}")]
    Transport { reason: String },
}

/// 1 受信者への配信失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Slack メッセージの送信に失敗しました（{kind}）: 送信先 {}", .request.address)]
pub struct DeliveryFailure {
    kind:    DeliveryFailureKind,
    request: RequestSnapshot,
}

impl DeliveryFailure {
    /// 2xx 以外のレスポンスによる失敗
    pub fn rejected(status: u16, request: RequestSnapshot) -> Self {
        Self {
            kind: DeliveryFailureKind::Rejected { status },
            request,
        }
    }

    /// トランスポート層の失敗
    pub fn transport(reason: impl Into<String>, request: RequestSnapshot) -> Self {
        Self {
            kind: DeliveryFailureKind::Transport {
                reason: reason.into(),
            },
            request,
        }
    }

    pub fn kind(&self) -> &DeliveryFailureKind {
        &self.kind
    }

    pub fn request(&self) -> &RequestSnapshot {
        &self.request
    }

    /// 受信したステータスコード（通信エラーの場合は `None`）
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            DeliveryFailureKind::Rejected { status } => Some(status),
            DeliveryFailureKind::Transport { .. } => None,
        }
    }
}

/// 受信者ごとの通知結果
///
/// ログ出力にのみ使い、永続化や集計結果の返却はしない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// 送信成功
    Sent,
    /// 送信失敗（後続の受信者への送信は継続する）
    Failed(DeliveryFailure),
    /// 送信先が未設定のため送信しなかった
    Skipped,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn snapshot() -> RequestSnapshot {
        RequestSnapshot {
            address: "https://hooks.slack.com/services/T000/B000/XXX".to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body:    r#"{"text":"Hello!"}"#.to_string(),
        }
    }

    #[test]
    fn test_webhook_messageはtextフィールドのjsonになる() {
        let json = serde_json::to_string(&WebhookMessage::new("Hello!")).unwrap();
        assert_eq!(json, r#"{"text":"Hello!"}"#);
    }

    #[test]
    fn test_rejectedはステータスコードとリクエスト情報を保持する() {
        let failure = DeliveryFailure::rejected(404, snapshot());

        assert_eq!(failure.status_code(), Some(404));
        assert_eq!(failure.request(), &snapshot());
        assert_eq!(
            failure.to_string(),
            "Slack メッセージの送信に失敗しました（HTTP 404 を受信）: 送信先 \
             https://hooks.slack.com/services/T000/B000/XXX"
        );
    }

    #[test]
    fn test_transportはステータスコードを持たない() {
        let failure = DeliveryFailure::transport("connection refused", snapshot());

        assert_eq!(failure.status_code(), None);
        assert!(matches!(
            failure.kind(),
            DeliveryFailureKind::Transport { reason } if reason == "connection refused"
        ));
    }
}
