//! # 通知ユースケース
//!
//! メニュー公開時の Slack 通知を構成する部品と、それらを統合するジョブ。
//!
//! ## モジュール構成
//!
//! - [`recipient_selector`] - 国籍コードによる受信者の選択
//! - [`digest_renderer`] - tera テンプレートによるダイジェスト生成
//! - [`service`] - 選択 + 生成 + 送信を統合する通知ジョブ
//! - [`trigger`] - ジョブのバックグラウンド実行

pub mod digest_renderer;
pub mod recipient_selector;
pub mod service;
pub mod trigger;

pub use digest_renderer::{DigestRenderer, MenuDigestRenderer};
pub use recipient_selector::select_recipients;
pub use service::{DEFAULT_NATIONALITY_CODE, MenuNotificationJob};
pub use trigger::NotificationTrigger;
