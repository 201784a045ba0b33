//! # 受信者の選択
//!
//! メニューの注文から、指定した国籍コードを持つ従業員の送信先を取り出す。
//!
//! - 注文の作成順を保つ
//! - 同じ従業員が複数回注文していれば、その回数だけ含める（重複排除しない）
//! - 送信先が未設定の従業員も `None` として含める。送信するかどうかはジョブ側で決める

use mealbell_domain::menu::Menu;

/// 国籍コードが一致する従業員の送信先を注文順に返す
///
/// 国籍コードは大文字小文字を区別して完全一致で比較する。
pub fn select_recipients<'a>(menu: &'a Menu, iso2_code: &str) -> Vec<Option<&'a str>> {
    tracing::info!("国籍 [{iso2_code}] の従業員の Slack Webhook を取得します");

    menu.orders()
        .iter()
        .filter(|order| order.employee.has_nationality(iso2_code))
        .map(|order| order.employee.slack_web_hook.as_deref())
        .collect()
}
