//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗（CPF、CEP、電話番号など） |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//!
//! ## 使用例
//!
//! ```rust
//! use drivent_domain::DomainError;
//!
//! fn validate_name(name: &str) -> Result<(), DomainError> {
//!     if name.is_empty() {
//!         return Err(DomainError::Validation("氏名は必須です".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! let error = DomainError::NotFound {
//!     entity_type: "Enrollment",
//!     id:          "user-1".to_string(),
//! };
//! assert_eq!(error.to_string(), "Enrollment が見つかりません: user-1");
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
   /// バリデーションエラー
   ///
   /// 入力値がビジネスルールに違反している場合に使用する。
   ///
   /// # 例
   ///
   /// - CPF のチェックディジット不一致
   /// - CEP が 8 桁でない
   /// - 存在しない州コード（UF）
   #[error("バリデーションエラー: {0}")]
   Validation(String),

   /// エンティティが見つからない
   ///
   /// - `entity_type`: エンティティの種類（"Enrollment", "TicketType" など）
   /// - `id`: 検索に使用した識別子
   #[error("{entity_type} が見つかりません: {id}")]
   NotFound {
      /// エンティティの種類
      entity_type: &'static str,
      /// 検索に使用した識別子
      id:          String,
   },
}
