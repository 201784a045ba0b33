//! # メニュー
//!
//! 日替わりメニューと、それに紐づくメニューオプション・注文・従業員を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Menu`] | メニュー | 管理者が公開する日付単位のメニュー |
//! | [`MenuOption`] | メニューオプション | 選択可能な一品。1 始まりの表示順位を持つ |
//! | [`Order`] | 注文 | 従業員 1 人がメニューに対して行う選択 |
//! | [`Employee`] | 従業員 | 注文者であり通知の受信者。国籍コードと Slack Webhook を持つ |
//!
//! ## 設計方針
//!
//! - **事前ロード済みの射影**: リポジトリは注文に従業員と国籍コードを解決した状態で返す。
//!   通知処理は遅延ロードに依存しない
//! - **挿入順の保持**: `orders` は作成順。通知の送信順はこの順序に従う

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

define_uuid_id! {
    /// メニュー ID
    ///
    /// 公開 API や通知ジョブの引数で使う一意キー。
    pub struct MenuId;
}

/// メニューオプション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    /// 料理の説明（自由記述）
    pub description:   String,
    /// 表示順位（メニュー内で一意であることが期待される）
    pub option_number: i32,
}

impl MenuOption {
    pub fn new(description: impl Into<String>, option_number: i32) -> Self {
        Self {
            description: description.into(),
            option_number,
        }
    }
}

/// 従業員（通知の受信者）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name:             String,
    /// 国籍の ISO 3166-1 alpha-2 コード（未設定の場合あり）
    pub nationality_code: Option<String>,
    /// Slack Incoming Webhook URL（未設定の場合あり）
    pub slack_web_hook:   Option<String>,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        nationality_code: Option<&str>,
        slack_web_hook: Option<&str>,
    ) -> Self {
        Self {
            name:             name.into(),
            nationality_code: nationality_code.map(str::to_string),
            slack_web_hook:   slack_web_hook.map(str::to_string),
        }
    }

    /// 国籍コードが一致するか（大文字小文字を区別する完全一致）
    pub fn has_nationality(&self, iso2_code: &str) -> bool {
        self.nationality_code.as_deref() == Some(iso2_code)
    }
}

/// 注文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub employee:        Employee,
    pub selected_option: i32,
    pub customizations:  String,
}

impl Order {
    pub fn new(employee: Employee, selected_option: i32, customizations: impl Into<String>) -> Self {
        Self {
            employee,
            selected_option,
            customizations: customizations.into(),
        }
    }
}

/// メニュー
///
/// 通知処理に必要なメニューオプションと注文を保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    id:           MenuId,
    date:         NaiveDate,
    is_published: bool,
    meal_options: Vec<MenuOption>,
    orders:       Vec<Order>,
}

impl Menu {
    pub fn new(
        id: MenuId,
        date: NaiveDate,
        is_published: bool,
        meal_options: Vec<MenuOption>,
        orders: Vec<Order>,
    ) -> Self {
        Self {
            id,
            date,
            is_published,
            meal_options,
            orders,
        }
    }

    pub fn id(&self) -> &MenuId {
        &self.id
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    /// 保存順のメニューオプション
    pub fn meal_options(&self) -> &[MenuOption] {
        &self.meal_options
    }

    /// 作成順の注文
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// 表示順位の昇順に並べたメニューオプション
    ///
    /// 安定ソートのため、順位が重複した場合は保存順を保つ。
    pub fn meal_options_by_rank(&self) -> Vec<&MenuOption> {
        let mut options: Vec<&MenuOption> = self.meal_options.iter().collect();
        options.sort_by_key(|option| option.option_number);
        options
    }

    /// 公開可能か（メニューオプションが 1 件以上あるか）
    pub fn has_meal_options(&self) -> bool {
        !self.meal_options.is_empty()
    }

    /// 公開済みにしたメニューを返す
    pub fn published(self) -> Self {
        Self {
            is_published: true,
            ..self
        }
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Menu of day: {}", self.date.format("%Y-%m-%d"))
    }
}
