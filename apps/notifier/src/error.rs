//! # Notifier エラー定義
//!
//! ユースケース層で発生するエラーを集約する。
//! CLI のトップレベルでは `anyhow` で受けて表示する。

use mealbell_domain::{DomainError, notification::NotificationError};
use mealbell_infra::InfraError;
use thiserror::Error;

/// Notifier で発生するエラー
#[derive(Debug, Error)]
pub enum NotifierError {
    /// ドメインエラー（メニューが見つからない など）
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// ダイジェスト生成の失敗
    #[error("通知エラー: {0}")]
    Notification(#[from] NotificationError),

    /// インフラエラー（DB など）
    #[error("インフラエラー: {0}")]
    Infra(#[from] InfraError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ドメインエラーはそのまま表示する() {
        let e: NotifierError = DomainError::NotFound {
            entity_type: "Menu",
            id:          "abc".to_string(),
        }
        .into();

        assert_eq!(e.to_string(), "Menu が見つかりません: abc");
    }
}
