//! # メニュー通知ジョブ
//!
//! メニュー取得 → 受信者選択 → ダイジェスト生成 → 受信者ごとの送信 を統合する。
//!
//! ## 設計方針
//!
//! - **起動方法に依存しない**: 同期実行でも [`NotificationTrigger`](super::NotificationTrigger)
//!   経由のバックグラウンド実行でも同じメソッドを呼ぶ
//! - **失敗の分離**: 1 受信者への送信失敗はログに残して次の受信者へ進む。
//!   致命的なのはメニューの取得失敗とダイジェスト生成失敗のみ
//! - **生成は 1 回**: ダイジェストは受信者数に関係なく 1 回だけ生成し、全送信で共有する
//! - **リトライしない**: 失敗した送信は再送しない。送信済みの記録も持たない

use std::sync::Arc;

use mealbell_domain::{
    DomainError,
    menu::MenuId,
    notification::{DeliveryFailure, NotificationOutcome, WebhookMessage},
};
use mealbell_infra::{notification::MessageDispatcher, repository::MenuRepository};
use mealbell_shared::{
    event_log::{error, event},
    log_business_event,
};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::Instrument as _;

use super::{DigestRenderer, select_recipients};
use crate::error::NotifierError;

/// 国籍コードを指定しない場合の既定値（チリ）
pub const DEFAULT_NATIONALITY_CODE: &str = "CL";

/// 送信結果の集計（ログ出力用）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DispatchSummary {
    sent:    usize,
    failed:  usize,
    skipped: usize,
}

impl DispatchSummary {
    fn record(&mut self, outcome: &NotificationOutcome) {
        match outcome {
            NotificationOutcome::Sent => self.sent += 1,
            NotificationOutcome::Failed(_) => self.failed += 1,
            NotificationOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// メニュー通知ジョブ
///
/// メニューに注文した従業員のうち、指定した国籍の従業員へ
/// Slack でメニューを通知する。
pub struct MenuNotificationJob {
    menu_repo:            Arc<dyn MenuRepository>,
    renderer:             Arc<dyn DigestRenderer>,
    dispatcher:           Arc<dyn MessageDispatcher>,
    dispatch_concurrency: usize,
}

impl MenuNotificationJob {
    /// 送信を 1 件ずつ順に行うジョブを作成する
    pub fn new(
        menu_repo: Arc<dyn MenuRepository>,
        renderer: Arc<dyn DigestRenderer>,
        dispatcher: Arc<dyn MessageDispatcher>,
    ) -> Self {
        Self {
            menu_repo,
            renderer,
            dispatcher,
            dispatch_concurrency: 1,
        }
    }

    /// 同時に実行する送信数の上限を設定する（1 未満は 1 とみなす）
    pub fn with_dispatch_concurrency(mut self, concurrency: usize) -> Self {
        self.dispatch_concurrency = concurrency.max(1);
        self
    }

    /// メニュー公開の通知を送る
    ///
    /// 全受信者への送信を試行し終えてから戻る。個別の送信失敗はエラーにしない。
    ///
    /// # エラー
    ///
    /// - メニューが存在しない場合は `DomainError::NotFound`
    /// - メニュー取得時の DB エラー
    /// - ダイジェスト生成の失敗
    #[tracing::instrument(skip_all, fields(menu_id = %menu_id, nationality = %iso2_code))]
    pub async fn notify_menu_published(
        &self,
        menu_id: &MenuId,
        iso2_code: &str,
    ) -> Result<(), NotifierError> {
        let menu =
            self.menu_repo
                .find_by_id(menu_id)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    entity_type: "Menu",
                    id:          menu_id.to_string(),
                })?;

        let mut summary = DispatchSummary::default();
        let mut addresses = Vec::new();
        for address in select_recipients(&menu, iso2_code) {
            // 空白だけの送信先もスキップするが、送信時は登録値をそのまま使う
            match address.filter(|a| !a.trim().is_empty()) {
                Some(address) => addresses.push(address.to_string()),
                None => {
                    let outcome = NotificationOutcome::Skipped;
                    log_outcome(menu_id, "", &outcome);
                    summary.record(&outcome);
                }
            }
        }

        let message = WebhookMessage::new(self.renderer.render(&menu)?);

        tracing::info!(recipients = addresses.len(), "Slack メッセージを送信します");

        if self.dispatch_concurrency == 1 {
            for address in &addresses {
                let outcome = into_outcome(self.dispatcher.dispatch(&message, address).await);
                log_outcome(menu_id, address, &outcome);
                summary.record(&outcome);
            }
        } else {
            self.dispatch_concurrently(menu_id, Arc::new(message), addresses, &mut summary)
                .await;
        }

        let result = if summary.failed == 0 {
            event::result::SUCCESS
        } else {
            event::result::FAILURE
        };
        log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::NOTIFICATION_JOB_COMPLETED,
            event.entity_type = event::entity_type::MENU,
            event.entity_id = %menu_id,
            event.result = result,
            notification.sent = summary.sent,
            notification.failed = summary.failed,
            notification.skipped = summary.skipped,
            "メニュー通知ジョブ完了"
        );

        Ok(())
    }

    /// 上限付きで並行に送信し、全タスクの完了を待つ
    async fn dispatch_concurrently(
        &self,
        menu_id: &MenuId,
        message: Arc<WebhookMessage>,
        addresses: Vec<String>,
        summary: &mut DispatchSummary,
    ) {
        let semaphore = Arc::new(Semaphore::new(self.dispatch_concurrency));
        let mut tasks = JoinSet::new();

        for address in addresses {
            let dispatcher = Arc::clone(&self.dispatcher);
            let message = Arc::clone(&message);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(
                async move {
                    let _permit = semaphore.acquire_owned().await;
                    let outcome = into_outcome(dispatcher.dispatch(&message, &address).await);
                    (address, outcome)
                }
                .in_current_span(),
            );
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((address, outcome)) => {
                    log_outcome(menu_id, &address, &outcome);
                    summary.record(&outcome);
                }
                Err(e) => {
                    tracing::error!(
                        error.category = error::category::EXTERNAL_SERVICE,
                        error.kind = error::kind::WEBHOOK_DELIVERY,
                        error = %e,
                        "送信タスクが異常終了しました"
                    );
                    summary.failed += 1;
                }
            }
        }
    }
}

fn into_outcome(result: Result<(), DeliveryFailure>) -> NotificationOutcome {
    match result {
        Ok(()) => NotificationOutcome::Sent,
        Err(failure) => NotificationOutcome::Failed(failure),
    }
}

fn log_outcome(menu_id: &MenuId, address: &str, outcome: &NotificationOutcome) {
    match outcome {
        NotificationOutcome::Sent => {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SENT,
                event.entity_type = event::entity_type::MENU,
                event.entity_id = %menu_id,
                event.result = event::result::SUCCESS,
                notification.address = %address,
                "Slack メッセージ送信成功"
            );
        }
        NotificationOutcome::Failed(failure) => {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_FAILED,
                event.entity_type = event::entity_type::MENU,
                event.entity_id = %menu_id,
                event.result = event::result::FAILURE,
                notification.address = %address,
                "Slack メッセージ送信失敗"
            );
            tracing::error!(
                error.category = error::category::EXTERNAL_SERVICE,
                error.kind = error::kind::WEBHOOK_DELIVERY,
                notification.address = %failure.request().address,
                notification.status = failure.status_code(),
                notification.request_headers = ?failure.request().headers,
                notification.request_body = %failure.request().body,
                error = %failure,
                "Slack メッセージの送信に失敗したため次の受信者へ進みます"
            );
        }
        NotificationOutcome::Skipped => {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.entity_type = event::entity_type::EMPLOYEE,
                event.result = event::result::SKIPPED,
                "Slack Webhook が未設定のため送信をスキップ"
            );
        }
    }
}
