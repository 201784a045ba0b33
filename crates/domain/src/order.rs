//! # 注文
//!
//! 従業員によるメニューへの注文登録と、その受付ルールを表現する。
//!
//! - 1 メニューにつき 1 従業員 1 注文まで
//! - 受付は現地時刻（既定: America/Santiago）の締切時刻まで。締切ちょうどは受け付ける
//!
//! 締切の判定は時刻のみで行い、メニューの日付とは比較しない。

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::menu::MenuId;

/// 従業員 ID（employees テーブルの連番）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("{_0}")]
pub struct EmployeeId(i64);

impl EmployeeId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// 登録前の注文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub menu_id:         MenuId,
    pub employee_id:     EmployeeId,
    pub selected_option: i32,
    pub customizations:  String,
}

impl NewOrder {
    pub fn new(
        menu_id: MenuId,
        employee_id: EmployeeId,
        selected_option: i32,
        customizations: impl Into<String>,
    ) -> Self {
        Self {
            menu_id,
            employee_id,
            selected_option,
            customizations: customizations.into(),
        }
    }
}

/// 既定の締切時刻（11:00）
pub const DEFAULT_ORDER_DEADLINE: NaiveTime = match NaiveTime::from_hms_opt(11, 0, 0) {
    Some(time) => time,
    None => panic!("11:00 は有効な時刻"),
};

/// 既定のタイムゾーン（チリ）
pub const DEFAULT_ORDER_TIMEZONE: Tz = Tz::America__Santiago;

/// 注文の受付締切
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderCutoff {
    deadline: NaiveTime,
    timezone: Tz,
}

impl OrderCutoff {
    pub fn new(deadline: NaiveTime, timezone: Tz) -> Self {
        Self { deadline, timezone }
    }

    pub fn deadline(&self) -> NaiveTime {
        self.deadline
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// `now` の現地時刻が締切以前なら受け付ける
    pub fn accepts(&self, now: DateTime<Utc>) -> bool {
        now.with_timezone(&self.timezone).time() <= self.deadline
    }
}

impl Default for OrderCutoff {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER_DEADLINE, DEFAULT_ORDER_TIMEZONE)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    // 10 月のサンティアゴは夏時間（UTC-3）、6 月は標準時（UTC-4）
    #[rstest]
    #[case(utc(2026, 10, 19, 13, 59, 59), true)]
    #[case(utc(2026, 10, 19, 14, 0, 0), true)]
    #[case(utc(2026, 10, 19, 14, 0, 1), false)]
    #[case(utc(2026, 6, 15, 14, 30, 0), true)]
    #[case(utc(2026, 6, 15, 15, 0, 1), false)]
    #[case(utc(2026, 10, 19, 3, 30, 0), true)]
    fn test_サンティアゴの11時まで受け付ける(#[case] now: DateTime<Utc>, #[case] expected: bool) {
        assert_eq!(OrderCutoff::default().accepts(now), expected);
    }

    #[test]
    fn test_締切とタイムゾーンを変更できる() {
        let cutoff = OrderCutoff::new(NaiveTime::from_hms_opt(9, 30, 0).unwrap(), Tz::UTC);

        assert!(cutoff.accepts(utc(2026, 10, 19, 9, 30, 0)));
        assert!(!cutoff.accepts(utc(2026, 10, 19, 9, 31, 0)));
    }

    #[test]
    fn test_employee_idは数値で表示する() {
        assert_eq!(EmployeeId::new(42).to_string(), "42");
    }
}
