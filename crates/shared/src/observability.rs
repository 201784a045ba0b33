//! # ログ出力の初期化
//!
//! CLI 起動時に一度だけ subscriber を登録する。出力形式は `LOG_FORMAT` で選ぶ。
//! 送信失敗の診断ログを集計基盤で扱えるよう、本番は `json` を想定している。

/// `LOG_FORMAT` の値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON（フィールドはトップレベルに展開）
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// `"json"` / `"pretty"` 以外は Pretty 扱い
    ///
    /// subscriber の登録前に呼ばれるので、警告は stderr に直接書く。
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|val| Self::parse(&val))
            .unwrap_or_default()
    }
}

/// [`init_tracing`] の引数
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// ルートスパンの `service` フィールド
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// グローバル subscriber を登録し、CLI 全体を包むスパンを返す
///
/// フィルタは `RUST_LOG`、未設定なら `info,mealbell=debug`。
/// `ErrorLayer` を重ねておくと `InfraError` の `SpanTrace` にメニュー ID などの
/// スパンフィールドが残る。2 回目以降の呼び出しは panic する。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) -> tracing::Span {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,mealbell=debug".into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::info_span!("mealbell", service = %config.service_name)
}
