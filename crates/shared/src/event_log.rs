//! # ビジネスイベントログ
//!
//! メニュー公開や通知送信の結果を `jq` で追跡できるよう、ログフィールドの
//! 命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` / `tracing::warn!` に `error.category` + `error.kind` フィールドを
//! 直接追加する。定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`notification.address`）を使用する。
//! JSON 出力ではフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID（メニュー ID など）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const MENU: &str = "menu";
        pub const NOTIFICATION: &str = "notification";
        pub const ORDER: &str = "order";
    }

    /// イベントアクション
    pub mod action {
        // メニュー
        pub const MENU_PUBLISHED: &str = "menu.published";

        // 注文
        pub const ORDER_PLACED: &str = "order.placed";
        pub const ORDER_REJECTED: &str = "order.rejected";

        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
        pub const NOTIFICATION_SKIPPED: &str = "notification.skipped";
        pub const NOTIFICATION_JOB_COMPLETED: &str = "notification.job_completed";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const MENU: &str = "menu";
        pub const EMPLOYEE: &str = "employee";
        pub const ORDER: &str = "order";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
        pub const SKIPPED: &str = "skipped";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// インフラストラクチャ（DB）
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// 外部サービス呼び出し（Slack Webhook）
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    /// エラー種別
    pub mod kind {
        pub const DATABASE: &str = "database";
        pub const TEMPLATE: &str = "template";
        pub const WEBHOOK_DELIVERY: &str = "webhook_delivery";
    }
}
