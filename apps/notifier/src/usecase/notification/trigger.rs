//! # 通知ジョブのバックグラウンド実行
//!
//! 呼び出し元をブロックせずに [`MenuNotificationJob`] を tokio ランタイム上で実行する。
//! ジョブの致命的なエラーはここでログに残し、呼び出し元へは伝播しない。

use std::sync::Arc;

use mealbell_domain::menu::MenuId;
use mealbell_shared::event_log::error;
use tokio::task::JoinHandle;
use tracing::Instrument as _;

use super::MenuNotificationJob;
use crate::error::NotifierError;

/// 通知ジョブの起動口
#[derive(Clone)]
pub struct NotificationTrigger {
    job: Arc<MenuNotificationJob>,
}

impl NotificationTrigger {
    pub fn new(job: Arc<MenuNotificationJob>) -> Self {
        Self { job }
    }

    /// 通知ジョブをバックグラウンドで開始する
    ///
    /// 戻り値のハンドルは待っても捨ててもよい。捨てた場合もジョブは最後まで実行される。
    pub fn schedule(&self, menu_id: MenuId, iso2_code: impl Into<String>) -> JoinHandle<()> {
        let job = Arc::clone(&self.job);
        let iso2_code = iso2_code.into();

        tracing::info!(menu_id = %menu_id, nationality = %iso2_code, "メニュー通知ジョブを登録します");

        tokio::spawn(
            async move {
                if let Err(e) = job.notify_menu_published(&menu_id, &iso2_code).await {
                    log_job_failure(&menu_id, &e);
                }
            }
            .in_current_span(),
        )
    }
}

fn log_job_failure(menu_id: &MenuId, e: &NotifierError) {
    match e {
        NotifierError::Infra(infra) => tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::DATABASE,
            menu_id = %menu_id,
            error = %e,
            span_trace = %infra.span_trace(),
            "メニュー通知ジョブが失敗しました"
        ),
        NotifierError::Notification(_) => tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::TEMPLATE,
            menu_id = %menu_id,
            error = %e,
            "メニュー通知ジョブが失敗しました"
        ),
        _ => tracing::error!(menu_id = %menu_id, error = %e, "メニュー通知ジョブが失敗しました"),
    }
}
