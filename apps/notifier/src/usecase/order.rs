//! # 注文登録ユースケース
//!
//! 受付ルールを満たす注文だけを登録する。判定順は次のとおり:
//!
//! 1. メニューが存在すること（公開前でも注文できる）
//! 2. 同じ従業員の注文がまだないこと
//! 3. 現在時刻が受付締切以前であること

use std::sync::Arc;

use mealbell_domain::{
    DomainError,
    clock::Clock,
    order::{NewOrder, OrderCutoff},
};
use mealbell_infra::repository::{MenuRepository, OrderRepository};
use mealbell_shared::{event_log::event, log_business_event};

use crate::error::NotifierError;

/// 注文登録ユースケース
pub struct PlaceOrderUseCase {
    menu_repo:  Arc<dyn MenuRepository>,
    order_repo: Arc<dyn OrderRepository>,
    clock:      Arc<dyn Clock>,
    cutoff:     OrderCutoff,
}

impl PlaceOrderUseCase {
    pub fn new(
        menu_repo: Arc<dyn MenuRepository>,
        order_repo: Arc<dyn OrderRepository>,
        clock: Arc<dyn Clock>,
        cutoff: OrderCutoff,
    ) -> Self {
        Self {
            menu_repo,
            order_repo,
            clock,
            cutoff,
        }
    }

    /// 注文を登録する
    ///
    /// # エラー
    ///
    /// - メニューが存在しない: `DomainError::NotFound`
    /// - 注文済み: `DomainError::Conflict`
    /// - 締切後: `DomainError::Validation`
    #[tracing::instrument(
        skip_all,
        fields(menu_id = %order.menu_id, employee_id = %order.employee_id)
    )]
    pub async fn place(&self, order: NewOrder) -> Result<(), NotifierError> {
        let menu = self
            .menu_repo
            .find_by_id(&order.menu_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Menu",
                id:          order.menu_id.to_string(),
            })?;

        let already_ordered = || {
            DomainError::Conflict(format!(
                "{menu} には従業員 {} の注文が登録済みです。既存の注文を編集してください",
                order.employee_id
            ))
        };

        if self
            .order_repo
            .exists(&order.employee_id, &order.menu_id)
            .await?
        {
            log_rejected(&order, "duplicate");
            return Err(already_ordered().into());
        }

        if !self.cutoff.accepts(self.clock.now()) {
            log_rejected(&order, "past_cutoff");
            return Err(DomainError::Validation(format!(
                "注文の受付時刻を過ぎています。{} ({}) までに注文してください",
                self.cutoff.deadline().format("%H:%M"),
                self.cutoff.timezone()
            ))
            .into());
        }

        if !self.order_repo.insert(&order).await? {
            log_rejected(&order, "duplicate");
            return Err(already_ordered().into());
        }

        log_business_event!(
            event.category = event::category::ORDER,
            event.action = event::action::ORDER_PLACED,
            event.entity_type = event::entity_type::MENU,
            event.entity_id = %order.menu_id,
            event.result = event::result::SUCCESS,
            order.employee_id = %order.employee_id,
            order.selected_option = order.selected_option,
            "注文登録"
        );

        Ok(())
    }
}

fn log_rejected(order: &NewOrder, reason: &'static str) {
    log_business_event!(
        event.category = event::category::ORDER,
        event.action = event::action::ORDER_REJECTED,
        event.entity_type = event::entity_type::MENU,
        event.entity_id = %order.menu_id,
        event.result = event::result::FAILURE,
        order.employee_id = %order.employee_id,
        order.reason = reason,
        "注文を受け付けませんでした"
    );
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use mealbell_domain::{
        clock::FixedClock,
        menu::{Menu, MenuId, MenuOption},
        order::EmployeeId,
    };
    use mealbell_infra::mock::{MockMenuRepository, MockOrderRepository};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    /// サンティアゴ 10:00（2026-10-19 は UTC-3）
    fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap()
    }

    /// サンティアゴ 11:30
    fn late() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap()
    }

    struct Fixture {
        menu_repo:  MockMenuRepository,
        order_repo: MockOrderRepository,
        menu_id:    MenuId,
    }

    impl Fixture {
        fn new() -> Self {
            let menu_repo = MockMenuRepository::new();
            let menu = Menu::new(
                MenuId::new(),
                NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                false,
                vec![MenuOption::new("Cazuela", 1)],
                Vec::new(),
            );
            let menu_id = menu.id().clone();
            menu_repo.add_menu(menu);

            Self {
                menu_repo,
                order_repo: MockOrderRepository::new(),
                menu_id,
            }
        }

        fn sut(&self, now: DateTime<Utc>) -> PlaceOrderUseCase {
            PlaceOrderUseCase::new(
                Arc::new(self.menu_repo.clone()),
                Arc::new(self.order_repo.clone()),
                Arc::new(FixedClock::new(now)),
                OrderCutoff::default(),
            )
        }

        fn order(&self, employee_id: i64) -> NewOrder {
            NewOrder::new(
                self.menu_id.clone(),
                EmployeeId::new(employee_id),
                1,
                "sin cebolla",
            )
        }
    }

    #[tokio::test]
    async fn test_締切前の注文を登録する() {
        let fx = Fixture::new();

        fx.sut(morning()).place(fx.order(1)).await.unwrap();

        assert_eq!(fx.order_repo.orders(), vec![fx.order(1)]);
    }

    #[tokio::test]
    async fn test_同じ従業員の2件目の注文はconflictになる() {
        let fx = Fixture::new();
        let sut = fx.sut(morning());
        sut.place(fx.order(1)).await.unwrap();

        let result = sut.place(fx.order(1)).await;

        assert!(matches!(
            result,
            Err(NotifierError::Domain(DomainError::Conflict(_)))
        ));
        assert_eq!(fx.order_repo.orders().len(), 1);
    }

    #[tokio::test]
    async fn test_別の従業員は同じメニューに注文できる() {
        let fx = Fixture::new();
        let sut = fx.sut(morning());

        sut.place(fx.order(1)).await.unwrap();
        sut.place(fx.order(2)).await.unwrap();

        assert_eq!(fx.order_repo.orders().len(), 2);
    }

    #[rstest]
    #[case(Utc.with_ymd_and_hms(2026, 10, 19, 14, 0, 0).unwrap(), true)]
    #[case(Utc.with_ymd_and_hms(2026, 10, 19, 14, 0, 1).unwrap(), false)]
    #[tokio::test]
    async fn test_11時ちょうどまで受け付ける(
        #[case] now: DateTime<Utc>,
        #[case] accepted: bool,
    ) {
        let fx = Fixture::new();

        let result = fx.sut(now).place(fx.order(1)).await;

        assert_eq!(result.is_ok(), accepted);
    }

    #[tokio::test]
    async fn test_締切後の注文はvalidationエラーで登録しない() {
        let fx = Fixture::new();

        let result = fx.sut(late()).place(fx.order(1)).await;

        match result {
            Err(NotifierError::Domain(DomainError::Validation(msg))) => {
                assert!(msg.contains("11:00"), "{msg}");
                assert!(msg.contains("America/Santiago"), "{msg}");
            }
            other => panic!("Validation を期待したが {other:?}"),
        }
        assert!(fx.order_repo.orders().is_empty());
    }

    #[tokio::test]
    async fn test_注文済みなら締切後でもconflictを優先する() {
        let fx = Fixture::new();
        fx.sut(morning()).place(fx.order(1)).await.unwrap();

        let result = fx.sut(late()).place(fx.order(1)).await;

        assert!(matches!(
            result,
            Err(NotifierError::Domain(DomainError::Conflict(_)))
        ));
    }

    #[tokio::test]
    async fn test_存在しないメニューへの注文はnot_foundになる() {
        let fx = Fixture::new();
        let order = NewOrder::new(MenuId::new(), EmployeeId::new(1), 1, "");

        let result = fx.sut(morning()).place(order).await;

        assert!(matches!(
            result,
            Err(NotifierError::Domain(DomainError::NotFound {
                entity_type: "Menu",
                ..
            }))
        ));
        assert!(fx.order_repo.orders().is_empty());
    }
}
