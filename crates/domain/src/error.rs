//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! | エラー種別 | 用途 |
//! |-----------|------|
//! | `Validation` | 入力値の検証失敗（ID の形式不正など） |
//! | `NotFound` | エンティティが存在しない（通知ジョブ唯一の致命的失敗） |
//! | `Conflict` | 同じ従業員の注文が登録済み |

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// エンティティが見つからない
    ///
    /// `entity_type` にはエンティティの種類（"Menu" など）を指定する。
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },

    /// 既存データとの競合
    #[error("競合が発生しました: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_foundのメッセージにエンティティ種別とidを含む() {
        let err = DomainError::NotFound {
            entity_type: "Menu",
            id:          "0190a6c2-0000-7000-8000-000000000000".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Menu が見つかりません: 0190a6c2-0000-7000-8000-000000000000"
        );
    }
}
