//! # Drivent ドメイン層
//!
//! イベント参加受付（エンロールメント）とチケット購入のドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: Enrollment, Ticket）
//! - **値オブジェクト**: 生成時に検証される不変オブジェクト（例: Cep, Cpf, Uf）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! core-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、外部サービス）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`clock`] - 現在時刻の抽象化
//! - [`user`] - ゲートウェイから渡されるユーザー識別子
//! - [`enrollment`] - 参加登録（氏名、CPF、誕生日、電話番号）
//! - [`address`] - 住所と CEP（郵便番号）
//! - [`ticket`] - チケットとチケット種別
//!
//! ## 使用例
//!
//! ```rust
//! use drivent_domain::{DomainError, address::Cep};
//!
//! let cep = Cep::new("01001-000").unwrap();
//! assert_eq!(cep.as_str(), "01001000");
//!
//! let error = Cep::new("123").unwrap_err();
//! assert!(matches!(error, DomainError::Validation(_)));
//! ```

#[macro_use]
mod macros;

pub mod address;
pub mod clock;
pub mod enrollment;
pub mod error;
pub mod ticket;
pub mod user;

pub use error::DomainError;
