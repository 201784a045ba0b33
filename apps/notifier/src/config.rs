//! # Notifier 設定
//!
//! 環境変数から Notifier の設定を読み込む。
//! テストでは [`NotifierConfig::from_lookup`] に任意の取得関数を渡す。

use std::{env, time::Duration};

use chrono::NaiveTime;
use chrono_tz::Tz;
use mealbell_domain::{
    menu::MenuId,
    order::{DEFAULT_ORDER_DEADLINE, DEFAULT_ORDER_TIMEZONE, OrderCutoff},
};
use thiserror::Error;

use crate::usecase::notification::DEFAULT_NATIONALITY_CODE;

const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DISPATCH_CONCURRENCY: usize = 1;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値を解釈できない
    #[error("{key} の値が不正です: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Notifier の設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// データベース接続 URL
    pub database_url: String,
    /// 通知設定
    pub notification: NotificationConfig,
    /// 注文の受付締切（`ORDER_CUTOFF_TIME` / `ORDER_TIMEZONE`）
    pub order_cutoff: OrderCutoff,
}

/// 送信バックエンド
///
/// `NOTIFICATION_BACKEND` 環境変数で切り替える:
/// - `slack`: Slack Incoming Webhook へ送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NotificationBackend {
    Slack,
    Noop,
}

/// 通知機能の設定
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// 送信バックエンド
    pub backend:              NotificationBackend,
    /// 国籍コードを指定しない場合に使う国籍
    pub default_nationality:  String,
    /// 1 回の送信のタイムアウト
    pub webhook_timeout:      Duration,
    /// 同時に実行する送信数の上限（1 で逐次送信）
    pub dispatch_concurrency: usize,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 取得関数から設定を読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            notification: NotificationConfig::from_lookup(&lookup)?,
            order_cutoff: order_cutoff_from_lookup(&lookup)?,
        })
    }
}

fn order_cutoff_from_lookup<F>(lookup: &F) -> Result<OrderCutoff, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let deadline = match lookup("ORDER_CUTOFF_TIME") {
        Some(value) => NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
            ConfigError::Invalid {
                key: "ORDER_CUTOFF_TIME",
                value,
            }
        })?,
        None => DEFAULT_ORDER_DEADLINE,
    };
    let timezone: Tz = parse_or(lookup, "ORDER_TIMEZONE", DEFAULT_ORDER_TIMEZONE)?;

    Ok(OrderCutoff::new(deadline, timezone))
}

impl NotificationConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("NOTIFICATION_BACKEND") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    key: "NOTIFICATION_BACKEND",
                    value,
                })?,
            None => NotificationBackend::Noop,
        };

        let default_nationality = lookup("NOTIFICATION_DEFAULT_NATIONALITY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_NATIONALITY_CODE.to_string());

        let timeout_secs: u64 = parse_or(
            lookup,
            "NOTIFICATION_WEBHOOK_TIMEOUT_SECS",
            DEFAULT_WEBHOOK_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key:   "NOTIFICATION_WEBHOOK_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let dispatch_concurrency: usize = parse_or(
            lookup,
            "NOTIFICATION_DISPATCH_CONCURRENCY",
            DEFAULT_DISPATCH_CONCURRENCY,
        )?;
        if dispatch_concurrency == 0 {
            return Err(ConfigError::Invalid {
                key:   "NOTIFICATION_DISPATCH_CONCURRENCY",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            backend,
            default_nationality,
            webhook_timeout: Duration::from_secs(timeout_secs),
            dispatch_concurrency,
        })
    }

    /// 国籍コードが指定されていなければ既定の国籍を返す
    pub fn nationality_or_default<'a>(&'a self, iso2_code: Option<&'a str>) -> &'a str {
        iso2_code.unwrap_or(self.default_nationality.as_str())
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// CLI 引数のメニュー ID を解釈する
pub fn parse_menu_id(value: &str) -> Result<MenuId, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        key:   "MENU_ID",
        value: value.to_string(),
    })
}
