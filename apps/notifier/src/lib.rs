//! # Mealbell Notifier
//!
//! メニュー公開時に、注文した従業員のうち指定した国籍の従業員へ
//! Slack でその日のメニューを通知する。
//! 注文は従業員ごとにメニュー 1 件まで、締切時刻（既定 11:00 America/Santiago）まで受け付ける。
//!
//! ## モジュール構成
//!
//! - [`config`]: 環境変数からの設定読み込み
//! - [`error`]: ユースケース層のエラー
//! - [`usecase`]: メニュー公開、公開済みメニューの参照、注文登録、通知ジョブ

pub mod config;
pub mod error;
pub mod usecase;
