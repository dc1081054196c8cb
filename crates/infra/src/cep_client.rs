//! # CEP 検索クライアント
//!
//! ViaCEP（`GET {base_url}/{cep}/json/`）で郵便番号から住所を引く。
//!
//! ## レスポンスの扱い
//!
//! | ViaCEP の応答 | 結果 |
//! |---|---|
//! | 200 + 住所 | `Ok(Some(CepAddress))` |
//! | 200 + `"erro": true`（または `"true"`） | `Ok(None)` |
//! | 4xx | `Ok(None)` |
//! | 5xx・接続失敗・タイムアウト | `Err(InfraError)` |
//!
//! 「存在しない CEP」と「サービス障害」を呼び出し側で区別できるようにしている。

use std::time::Duration;

use async_trait::async_trait;
use drivent_domain::address::{Cep, CepAddress};
use drivent_shared::observability::{REQUEST_ID_HEADER, current_request_id};
use serde::Deserialize;

use crate::error::InfraError;

/// CEP 検索クライアントトレイト
#[async_trait]
pub trait CepClient: Send + Sync {
   /// CEP から住所を検索する
   ///
   /// 存在しない CEP の場合は `Ok(None)`。
   async fn lookup(&self, cep: &Cep) -> Result<Option<CepAddress>, InfraError>;
}

/// ViaCEP のレスポンスボディ
///
/// 存在しない CEP には `{"erro": true}` を返す。新しい API では `"true"`（文字列）。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViaCepResponse {
   logradouro:  String,
   complemento: String,
   bairro:      String,
   localidade:  String,
   uf:          String,
   erro:        Option<serde_json::Value>,
}

impl ViaCepResponse {
   fn has_error_flag(&self) -> bool {
      match &self.erro {
         Some(serde_json::Value::Bool(flag)) => *flag,
         Some(serde_json::Value::String(flag)) => flag == "true",
         _ => false,
      }
   }
}

impl From<ViaCepResponse> for CepAddress {
   fn from(body: ViaCepResponse) -> Self {
      CepAddress {
         street:       body.logradouro,
         complement:   body.complemento,
         neighborhood: body.bairro,
         city:         body.localidade,
         uf:           body.uf,
      }
   }
}

/// ViaCEP クライアント実装
#[derive(Clone)]
pub struct ViaCepClient {
   base_url: String,
   client:   reqwest::Client,
}

impl ViaCepClient {
   /// 新しい ViaCepClient を作成する
   ///
   /// - `base_url`: 例 `https://viacep.com.br/ws`（末尾の `/` は除去）
   /// - `timeout`: 1 リクエストあたりのタイムアウト
   pub fn new(base_url: &str, timeout: Duration) -> Result<Self, InfraError> {
      let client = reqwest::Client::builder().timeout(timeout).build()?;
      Ok(Self {
         base_url: base_url.trim_end_matches('/').to_string(),
         client,
      })
   }

   fn request(&self, cep: &Cep) -> reqwest::RequestBuilder {
      let url = format!("{}/{}/json/", self.base_url, cep.as_str());
      inject_request_id(self.client.get(url))
   }
}

#[async_trait]
impl CepClient for ViaCepClient {
   #[tracing::instrument(skip_all, level = "debug", fields(cep = %cep))]
   async fn lookup(&self, cep: &Cep) -> Result<Option<CepAddress>, InfraError> {
      let response = self.request(cep).send().await?;
      handle_response(response).await
   }
}

/// 現在のリクエストの Request ID を `X-Request-Id` ヘッダーとして付与する
fn inject_request_id(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
   match current_request_id() {
      Some(id) => builder.header(REQUEST_ID_HEADER, id),
      None => builder,
   }
}

async fn handle_response(response: reqwest::Response) -> Result<Option<CepAddress>, InfraError> {
   let status = response.status();

   if status.is_client_error() {
      tracing::debug!(http.status_code = status.as_u16(), "ViaCEP が CEP を拒否しました");
      return Ok(None);
   }

   let body = response.text().await?;

   if !status.is_success() {
      return Err(InfraError::unexpected(format!(
         "ViaCEP が予期しないステータスを返しました {status}: {body}"
      )));
   }

   let parsed: ViaCepResponse = serde_json::from_str(&body)?;
   if parsed.has_error_flag() {
      return Ok(None);
   }

   Ok(Some(parsed.into()))
}
