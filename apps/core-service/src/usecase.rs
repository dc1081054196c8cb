//! # ユースケース層
//!
//! Core Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・CEP クライアント・Clock を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - `ticket`: チケット種別・チケット予約
//! - `enrollment`: エンロールメント・住所・CEP 検索

pub(crate) mod helpers;

pub mod enrollment;
pub mod ticket;

pub use enrollment::{AddressInput, EnrollmentUseCaseImpl, UpsertEnrollmentInput};
pub use ticket::{CreateTicketInput, TicketUseCaseImpl};
