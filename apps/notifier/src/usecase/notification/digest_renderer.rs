//! # ダイジェストレンダラー
//!
//! メニューオプションを表示順位の昇順に並べ、Slack に送るテキストを生成する。
//!
//! ## 出力形式
//!
//! ```text
//! Hello!
//! I share with you today's menu :)
//!
//! Option 1: <description 1>
//! Option 2: <description 2>
//!
//! Have a nice day!
//! ```
//!
//! 番号は保存されている表示順位ではなく、並べ替え後の 1 始まりの連番。
//! テンプレートは `include_str!` でバイナリに埋め込む。

use mealbell_domain::{menu::Menu, notification::NotificationError};
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "menu_digest.txt";

/// ダイジェスト生成トレイト
///
/// ジョブ 1 回につき 1 回だけ呼ばれる。
pub trait DigestRenderer: Send + Sync {
    /// メニューからダイジェスト本文を生成する
    fn render(&self, menu: &Menu) -> Result<String, NotificationError>;
}

/// tera テンプレートによるダイジェストレンダラー
pub struct MenuDigestRenderer {
    engine: Tera,
}

impl MenuDigestRenderer {
    /// 埋め込みテンプレートを登録したレンダラーを作成する
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();
        engine
            .add_raw_template(
                TEMPLATE_NAME,
                include_str!("../../../templates/notifications/menu_digest.txt"),
            )
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }
}

impl DigestRenderer for MenuDigestRenderer {
    fn render(&self, menu: &Menu) -> Result<String, NotificationError> {
        tracing::info!(menu = %menu, "メニューのダイジェストを生成します");

        let descriptions: Vec<&str> = menu
            .meal_options_by_rank()
            .into_iter()
            .map(|option| option.description.as_str())
            .collect();

        let mut context = Context::new();
        context.insert("options", &descriptions);

        self.engine
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))
    }
}
