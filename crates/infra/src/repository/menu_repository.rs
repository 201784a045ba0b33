//! # MenuRepository
//!
//! メニューの参照と公開状態の更新を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **事前ロード**: `find_by_id` はメニューオプションと注文（従業員・国籍コード込み）を
//!   まとめて取得する。N+1 を避けるため注文は従業員と JOIN する
//! - **挿入順**: 注文・メニューオプションは主キー順（作成順）で返す
//! - **実行時クエリ**: `query_as` + `FromRow` で行型にマップしてからドメイン型へ変換する

use async_trait::async_trait;
use chrono::NaiveDate;
use mealbell_domain::menu::{Employee, Menu, MenuId, MenuOption, Order};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// メニューリポジトリトレイト
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// ID でメニューを取得する
    ///
    /// メニューオプションと、従業員を解決済みの注文を含めて返す。
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(menu))`: メニューが見つかった場合
    /// - `Ok(None)`: メニューが見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_id(&self, id: &MenuId) -> Result<Option<Menu>, InfraError>;

    /// 公開済みのメニューだけを ID で取得する
    ///
    /// 未公開のメニューは存在しない場合と同じく `Ok(None)` を返す。
    async fn find_published_by_id(&self, id: &MenuId) -> Result<Option<Menu>, InfraError>;

    /// メニューを公開済みにする
    ///
    /// 更新対象の行が存在しなかった場合は `Ok(false)` を返す。
    async fn mark_published(&self, id: &MenuId) -> Result<bool, InfraError>;
}

/// PostgreSQL 実装の MenuRepository
#[derive(Debug, Clone)]
pub struct PostgresMenuRepository {
    pool: PgPool,
}

impl PostgresMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// メニューをオプション・注文とあわせて読み込む
    ///
    /// `published_only` が真なら未公開のメニューは `None` として扱う。
    async fn load_menu(
        &self,
        id: &MenuId,
        published_only: bool,
    ) -> Result<Option<Menu>, InfraError> {
        let Some(menu) = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, date, is_published
            FROM menus
            WHERE id = $1 AND (is_published OR NOT $2)
            "#,
        )
        .bind(id.as_uuid())
        .bind(published_only)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let options = sqlx::query_as::<_, MenuOptionRow>(
            r#"
            SELECT description, option_number
            FROM menu_options
            WHERE menu_id = $1
            ORDER BY id
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let orders = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT
                o.selected_option,
                o.customizations,
                e.name AS employee_name,
                e.nationality_code,
                e.slack_web_hook
            FROM orders o
            INNER JOIN employees e ON e.id = o.employee_id
            WHERE o.menu_id = $1
            ORDER BY o.id
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(assemble_menu(menu, options, orders)))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MenuRow {
    id:           Uuid,
    date:         NaiveDate,
    is_published: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct MenuOptionRow {
    description:   String,
    option_number: i32,
}

impl From<MenuOptionRow> for MenuOption {
    fn from(row: MenuOptionRow) -> Self {
        MenuOption::new(row.description, row.option_number)
    }
}

/// 注文 + 従業員の JOIN 結果
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    selected_option:  i32,
    customizations:   String,
    employee_name:    String,
    nationality_code: Option<String>,
    slack_web_hook:   Option<String>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        let employee = Employee {
            name:             row.employee_name,
            nationality_code: row.nationality_code,
            slack_web_hook:   row.slack_web_hook,
        };
        Order::new(employee, row.selected_option, row.customizations)
    }
}

fn assemble_menu(row: MenuRow, options: Vec<MenuOptionRow>, orders: Vec<OrderRow>) -> Menu {
    Menu::new(
        MenuId::from_uuid(row.id),
        row.date,
        row.is_published,
        options.into_iter().map(MenuOption::from).collect(),
        orders.into_iter().map(Order::from).collect(),
    )
}

#[async_trait]
impl MenuRepository for PostgresMenuRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(menu_id = %id))]
    async fn find_by_id(&self, id: &MenuId) -> Result<Option<Menu>, InfraError> {
        self.load_menu(id, false).await
    }

    #[tracing::instrument(skip_all, level = "debug", fields(menu_id = %id))]
    async fn find_published_by_id(&self, id: &MenuId) -> Result<Option<Menu>, InfraError> {
        self.load_menu(id, true).await
    }

    #[tracing::instrument(skip_all, level = "debug", fields(menu_id = %id))]
    async fn mark_published(&self, id: &MenuId) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE menus
            SET is_published = TRUE
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
