//! # Mealbell Notifier
//!
//! メニュー公開と Slack 通知を実行する CLI。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `NOTIFICATION_BACKEND` | No | `slack` または `noop`（デフォルト: `noop`） |
//! | `NOTIFICATION_DEFAULT_NATIONALITY` | No | 国籍コードの既定値（デフォルト: `CL`） |
//! | `NOTIFICATION_WEBHOOK_TIMEOUT_SECS` | No | 1 回の送信のタイムアウト秒数（デフォルト: `10`） |
//! | `NOTIFICATION_DISPATCH_CONCURRENCY` | No | 同時送信数の上限（デフォルト: `1`） |
//! | `ORDER_CUTOFF_TIME` | No | 注文の締切時刻 `HH:MM`（デフォルト: `11:00`） |
//! | `ORDER_TIMEZONE` | No | 締切時刻のタイムゾーン（デフォルト: `America/Santiago`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//!
//! ## 使い方
//!
//! ```bash
//! # 公開済みメニューの通知だけを送る
//! mealbell-notifier notify 0192f1c4-... --nationality CL
//!
//! # メニューを公開し、通知の完了まで待つ
//! mealbell-notifier publish 0192f1c4-...
//!
//! # 公開済みメニューを表示する
//! mealbell-notifier show 0192f1c4-...
//!
//! # 注文を登録する（締切後や注文済みならエラー）
//! mealbell-notifier order 0192f1c4-... --employee 42 --option 2
//!
//! # マイグレーションを適用する
//! mealbell-notifier migrate
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use mealbell_domain::{
    clock::SystemClock,
    order::{EmployeeId, NewOrder},
};
use mealbell_infra::{
    db,
    notification::{MessageDispatcher, NoopMessageDispatcher, SlackWebhookDispatcher},
    repository::{PostgresMenuRepository, PostgresOrderRepository},
};
use mealbell_notifier::{
    config::{NotificationBackend, NotificationConfig, NotifierConfig, parse_menu_id},
    usecase::{
        MenuNotificationJob,
        NotificationTrigger,
        PlaceOrderUseCase,
        PublishMenuUseCase,
        PublishOutcome,
        PublishedMenuQuery,
        notification::MenuDigestRenderer,
    },
};
use mealbell_shared::observability::{TracingConfig, init_tracing};
use tracing::Instrument as _;

#[derive(Parser)]
#[command(name = "mealbell-notifier")]
#[command(about = "メニュー公開と Slack 通知", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// メニューの通知ジョブを同期実行する
    Notify {
        /// メニュー ID（UUID）
        menu_id: String,

        /// 通知対象の国籍コード（省略時は NOTIFICATION_DEFAULT_NATIONALITY）
        #[arg(short, long)]
        nationality: Option<String>,
    },
    /// メニューを公開し、通知ジョブの完了を待つ
    Publish {
        /// メニュー ID（UUID）
        menu_id: String,

        /// 通知対象の国籍コード（省略時は NOTIFICATION_DEFAULT_NATIONALITY）
        #[arg(short, long)]
        nationality: Option<String>,
    },
    /// 公開済みメニューを表示する
    Show {
        /// メニュー ID（UUID）
        menu_id: String,
    },
    /// 注文を登録する
    Order {
        /// メニュー ID（UUID）
        menu_id: String,

        /// 従業員 ID
        #[arg(long)]
        employee: i64,

        /// 選択したメニューオプションの番号
        #[arg(long)]
        option: i32,

        /// 追加の要望
        #[arg(long, default_value = "")]
        customizations: String,
    },
    /// 埋め込みマイグレーションを適用する
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let tracing_config = TracingConfig::from_env("mealbell-notifier");
    let root_span = init_tracing(&tracing_config);

    run(cli).instrument(root_span).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = NotifierConfig::from_env().context("設定の読み込みに失敗しました")?;

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    if let Command::Migrate = cli.command {
        db::run_migrations(&pool)
            .await
            .context("マイグレーションに失敗しました")?;
        tracing::info!("マイグレーションを適用しました");
        return Ok(());
    }

    let menu_repo = Arc::new(PostgresMenuRepository::new(pool.clone()));

    match cli.command {
        Command::Show { menu_id } => {
            let menu = PublishedMenuQuery::new(menu_repo)
                .find(&parse_menu_id(&menu_id)?)
                .await?;
            println!("Requested menu: {menu}");
            for option in menu.meal_options_by_rank() {
                println!("  {}. {}", option.option_number, option.description);
            }
            return Ok(());
        }
        Command::Order {
            menu_id,
            employee,
            option,
            customizations,
        } => {
            let usecase = PlaceOrderUseCase::new(
                menu_repo,
                Arc::new(PostgresOrderRepository::new(pool)),
                Arc::new(SystemClock),
                config.order_cutoff,
            );
            let order = NewOrder::new(
                parse_menu_id(&menu_id)?,
                EmployeeId::new(employee),
                option,
                customizations,
            );
            usecase.place(order).await?;
            return Ok(());
        }
        _ => {}
    }

    let job = Arc::new(
        MenuNotificationJob::new(
            menu_repo.clone(),
            Arc::new(MenuDigestRenderer::new()?),
            build_dispatcher(&config.notification)?,
        )
        .with_dispatch_concurrency(config.notification.dispatch_concurrency),
    );

    match cli.command {
        Command::Notify {
            menu_id,
            nationality,
        } => {
            let menu_id = parse_menu_id(&menu_id)?;
            let iso2_code = config
                .notification
                .nationality_or_default(nationality.as_deref());
            job.notify_menu_published(&menu_id, iso2_code).await?;
        }
        Command::Publish {
            menu_id,
            nationality,
        } => {
            let menu_id = parse_menu_id(&menu_id)?;
            let iso2_code = config
                .notification
                .nationality_or_default(nationality.as_deref());
            let usecase = PublishMenuUseCase::new(menu_repo, NotificationTrigger::new(job));

            match usecase.publish(&menu_id, iso2_code).await? {
                PublishOutcome::Published { notification } => {
                    notification
                        .await
                        .context("通知ジョブの実行に失敗しました")?;
                    tracing::info!(menu_id = %menu_id, "メニューを公開しました");
                }
                PublishOutcome::NoMealOptions => {
                    tracing::warn!(menu_id = %menu_id, "メニューオプションがないため公開しませんでした");
                }
            }
        }
        Command::Show { .. } | Command::Order { .. } | Command::Migrate => {}
    }

    Ok(())
}

/// 設定に応じた送信手段を生成する
fn build_dispatcher(config: &NotificationConfig) -> anyhow::Result<Arc<dyn MessageDispatcher>> {
    tracing::info!(backend = %config.backend, "通知バックエンドを初期化します");

    let dispatcher: Arc<dyn MessageDispatcher> = match config.backend {
        NotificationBackend::Slack => Arc::new(
            SlackWebhookDispatcher::new(config.webhook_timeout)
                .context("HTTP クライアントの初期化に失敗しました")?,
        ),
        NotificationBackend::Noop => Arc::new(NoopMessageDispatcher),
    };
    Ok(dispatcher)
}
