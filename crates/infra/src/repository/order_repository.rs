//! # OrderRepository
//!
//! 注文の重複確認と登録を担当するリポジトリ。
//!
//! `orders (employee_id, menu_id)` の一意インデックスにより、
//! 同時に登録された場合も 1 従業員 1 メニュー 1 注文が保たれる。

use async_trait::async_trait;
use mealbell_domain::{
    menu::MenuId,
    order::{EmployeeId, NewOrder},
};
use sqlx::PgPool;

use crate::error::InfraError;

/// 注文リポジトリトレイト
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 従業員がメニューに注文済みか
    async fn exists(&self, employee_id: &EmployeeId, menu_id: &MenuId)
    -> Result<bool, InfraError>;

    /// 注文を登録する
    ///
    /// 同じ従業員・メニューの注文が既にあれば登録せず `Ok(false)` を返す。
    async fn insert(&self, order: &NewOrder) -> Result<bool, InfraError>;
}

/// PostgreSQL 実装の OrderRepository
#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%employee_id, %menu_id))]
    async fn exists(
        &self,
        employee_id: &EmployeeId,
        menu_id: &MenuId,
    ) -> Result<bool, InfraError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM orders WHERE employee_id = $1 AND menu_id = $2
            )
            "#,
        )
        .bind(employee_id.as_i64())
        .bind(menu_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(employee_id = %order.employee_id, menu_id = %order.menu_id)
    )]
    async fn insert(&self, order: &NewOrder) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            INSERT INTO orders (employee_id, menu_id, selected_option, customizations)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (employee_id, menu_id) DO NOTHING
            "#,
        )
        .bind(order.employee_id.as_i64())
        .bind(order.menu_id.as_uuid())
        .bind(order.selected_option)
        .bind(&order.customizations)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresOrderRepository>();
    }
}
