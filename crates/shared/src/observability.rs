//! # Observability 基盤
//!
//! トレーシング初期化、ログ出力形式、Request ID の生成と伝播を提供する。
//!
//! ## Request ID の流れ
//!
//! 1. `SetRequestIdLayer` が [`MakeRequestUuidV7`] で UUID v7 を採番する
//!    （クライアントが `X-Request-Id` を送ってきた場合はそれを使う）
//! 2. `TraceLayer` の [`make_request_span`] がスパンに `request_id` を載せる
//! 3. サービス側のミドルウェアが [`scope_request_id`] で task-local に保存する
//! 4. 外部 HTTP 呼び出しは [`current_request_id`] でヘッダーに付与する

/// Request ID ヘッダー名
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ログ出力形式
///
/// 環境変数 `LOG_FORMAT` で切り替える。
/// 未設定または不正な値の場合は [`Pretty`](LogFormat::Pretty)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
   /// JSON 形式（本番環境向け）
   Json,
   /// 人間が読みやすい形式（開発環境向け）
   #[default]
   Pretty,
}

impl LogFormat {
   /// 文字列からログ形式をパースする
   ///
   /// subscriber 初期化前に呼ばれるため、不正値の警告は stderr に出す。
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

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
   /// サービス名（`app` スパンの `service` フィールド）
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

/// トレーシングを初期化する
///
/// `RUST_LOG` 未設定時は `"info,drivent=debug"`。
/// `ErrorLayer` を登録するので、`InfraError` が捕捉する SpanTrace に
/// スパン名とフィールドが入る。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
   use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

   let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| "info,drivent=debug".into());

   let fmt_layer = match config.log_format {
      LogFormat::Json => tracing_subscriber::fmt::layer()
         .json()
         .flatten_event(true)
         .with_target(true)
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
}

/// UUID v7 で Request ID を採番する `MakeRequestId` 実装
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
   fn make_request_id<B>(
      &mut self,
      _request: &http::Request<B>,
   ) -> Option<tower_http::request_id::RequestId> {
      http::HeaderValue::from_str(&uuid::Uuid::now_v7().to_string())
         .ok()
         .map(tower_http::request_id::RequestId::new)
   }
}

/// `TraceLayer::make_span_with` 用のリクエストスパンを作る
///
/// `SetRequestIdLayer` の内側で呼ばれる前提で、`x-request-id` ヘッダーを
/// `request_id` フィールドに入れる。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
   let request_id = request
      .headers()
      .get(REQUEST_ID_HEADER)
      .and_then(|v| v.to_str().ok())
      .unwrap_or("-");

   tracing::info_span!(
      "request",
      method = %request.method(),
      uri = %request.uri(),
      request_id = %request_id,
   )
}

#[cfg(feature = "observability")]
tokio::task_local! {
   static REQUEST_ID: String;
}

/// Request ID を task-local に保存した状態で `future` を実行する
#[cfg(feature = "observability")]
pub async fn scope_request_id<F>(request_id: String, future: F) -> F::Output
where
   F: std::future::Future,
{
   REQUEST_ID.scope(request_id, future).await
}

/// 現在のリクエストの Request ID
///
/// task-local スコープ外（起動処理やテスト）では `None`。
#[cfg(feature = "observability")]
pub fn current_request_id() -> Option<String> {
   REQUEST_ID.try_with(Clone::clone).ok()
}
