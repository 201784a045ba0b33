//! # メニューユースケース
//!
//! - [`PublishMenuUseCase`]: メニューを公開状態にし、注文した従業員への通知ジョブを登録する。
//!   通知の完了は待たない
//! - [`PublishedMenuQuery`]: 公開済みのメニューだけを参照する。未公開のメニューは存在しないものとして扱う

use std::sync::Arc;

use mealbell_domain::{
    DomainError,
    menu::{Menu, MenuId},
};
use mealbell_infra::repository::MenuRepository;
use mealbell_shared::{event_log::event, log_business_event};
use tokio::task::JoinHandle;

use crate::{error::NotifierError, usecase::notification::NotificationTrigger};

/// 公開処理の結果
#[derive(Debug)]
pub enum PublishOutcome {
    /// 公開して通知ジョブを登録した
    ///
    /// ハンドルを待てば通知の完了まで待機できる。捨ててもジョブは続行する。
    Published { notification: JoinHandle<()> },
    /// メニューオプションがないため公開しなかった
    NoMealOptions,
}

/// メニュー公開ユースケース
pub struct PublishMenuUseCase {
    menu_repo: Arc<dyn MenuRepository>,
    trigger:   NotificationTrigger,
}

impl PublishMenuUseCase {
    pub fn new(menu_repo: Arc<dyn MenuRepository>, trigger: NotificationTrigger) -> Self {
        Self { menu_repo, trigger }
    }

    /// メニューを公開し、指定した国籍の従業員への通知を登録する
    ///
    /// # エラー
    ///
    /// - メニューが存在しない場合は `DomainError::NotFound`
    /// - DB エラー
    #[tracing::instrument(skip_all, fields(menu_id = %menu_id, nationality = %iso2_code))]
    pub async fn publish(
        &self,
        menu_id: &MenuId,
        iso2_code: &str,
    ) -> Result<PublishOutcome, NotifierError> {
        let not_found = || DomainError::NotFound {
            entity_type: "Menu",
            id:          menu_id.to_string(),
        };

        let menu = self
            .menu_repo
            .find_by_id(menu_id)
            .await?
            .ok_or_else(not_found)?;

        if !menu.has_meal_options() {
            tracing::warn!(menu = %menu, "メニューオプションがないため公開しません");
            return Ok(PublishOutcome::NoMealOptions);
        }

        if !self.menu_repo.mark_published(menu_id).await? {
            return Err(not_found().into());
        }

        log_business_event!(
            event.category = event::category::MENU,
            event.action = event::action::MENU_PUBLISHED,
            event.entity_type = event::entity_type::MENU,
            event.entity_id = %menu_id,
            event.result = event::result::SUCCESS,
            "メニュー公開"
        );

        let notification = self.trigger.schedule(menu_id.clone(), iso2_code);
        Ok(PublishOutcome::Published { notification })
    }
}

/// 公開済みメニューの参照
pub struct PublishedMenuQuery {
    menu_repo: Arc<dyn MenuRepository>,
}

impl PublishedMenuQuery {
    pub fn new(menu_repo: Arc<dyn MenuRepository>) -> Self {
        Self { menu_repo }
    }

    /// 公開済みのメニューを取得する
    ///
    /// 未公開または存在しない場合は `DomainError::NotFound`。
    #[tracing::instrument(skip_all, fields(menu_id = %menu_id))]
    pub async fn find(&self, menu_id: &MenuId) -> Result<Menu, NotifierError> {
        let menu = self
            .menu_repo
            .find_published_by_id(menu_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Menu",
                id:          menu_id.to_string(),
            })?;
        Ok(menu)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mealbell_domain::menu::{Employee, Menu, MenuOption, Order};
    use mealbell_infra::mock::{MockMenuRepository, MockMessageDispatcher};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::usecase::notification::{MenuDigestRenderer, MenuNotificationJob};

    struct Fixture {
        menu_repo:  MockMenuRepository,
        dispatcher: MockMessageDispatcher,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                menu_repo:  MockMenuRepository::new(),
                dispatcher: MockMessageDispatcher::new(),
            }
        }

        fn sut(&self) -> PublishMenuUseCase {
            let job = MenuNotificationJob::new(
                Arc::new(self.menu_repo.clone()),
                Arc::new(MenuDigestRenderer::new().unwrap()),
                Arc::new(self.dispatcher.clone()),
            );
            PublishMenuUseCase::new(
                Arc::new(self.menu_repo.clone()),
                NotificationTrigger::new(Arc::new(job)),
            )
        }

        fn add_menu(&self, options: Vec<MenuOption>) -> MenuId {
            let menu = Menu::new(
                MenuId::new(),
                NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                false,
                options,
                vec![
                    Order::new(Employee::new("Ana", Some("CL"), Some("https://hooks/ana")), 1, ""),
                    Order::new(Employee::new("Juan", Some("AR"), Some("https://hooks/juan")), 1, ""),
                ],
            );
            let id = menu.id().clone();
            self.menu_repo.add_menu(menu);
            id
        }
    }

    #[tokio::test]
    async fn test_公開すると通知ジョブが実行される() {
        let fx = Fixture::new();
        let menu_id = fx.add_menu(vec![MenuOption::new("Cazuela", 1)]);

        let outcome = fx.sut().publish(&menu_id, "CL").await.unwrap();

        let PublishOutcome::Published { notification } = outcome else {
            panic!("Published を期待した");
        };
        notification.await.unwrap();

        assert!(fx.menu_repo.menu(&menu_id).unwrap().is_published());
        assert_eq!(fx.dispatcher.attempted_addresses(), vec!["https://hooks/ana"]);
    }

    #[tokio::test]
    async fn test_メニューオプションがなければ公開も通知もしない() {
        let fx = Fixture::new();
        let menu_id = fx.add_menu(Vec::new());

        let outcome = fx.sut().publish(&menu_id, "CL").await.unwrap();

        assert!(matches!(outcome, PublishOutcome::NoMealOptions));
        assert!(!fx.menu_repo.menu(&menu_id).unwrap().is_published());
        assert!(fx.dispatcher.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_存在しないメニューはnot_foundを返す() {
        let fx = Fixture::new();

        let result = fx.sut().publish(&MenuId::new(), "CL").await;

        assert!(matches!(
            result,
            Err(NotifierError::Domain(DomainError::NotFound {
                entity_type: "Menu",
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn test_未公開のメニューは参照できない() {
        let fx = Fixture::new();
        let menu_id = fx.add_menu(vec![MenuOption::new("Cazuela", 1)]);
        let query = PublishedMenuQuery::new(Arc::new(fx.menu_repo.clone()));

        let result = query.find(&menu_id).await;

        assert!(matches!(
            result,
            Err(NotifierError::Domain(DomainError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_公開後のメニューは参照できる() {
        let fx = Fixture::new();
        let menu_id = fx.add_menu(vec![MenuOption::new("Cazuela", 1)]);
        let query = PublishedMenuQuery::new(Arc::new(fx.menu_repo.clone()));
        let PublishOutcome::Published { notification } =
            fx.sut().publish(&menu_id, "CL").await.unwrap()
        else {
            panic!("Published を期待した");
        };
        notification.await.unwrap();

        let menu = query.find(&menu_id).await.unwrap();

        assert_eq!(menu.id(), &menu_id);
        assert_eq!(menu.meal_options()[0].description, "Cazuela");
    }
}
