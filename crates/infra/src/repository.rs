//! # リポジトリ実装
//!
//! リポジトリトレイトと PostgreSQL 実装を提供する。
//!
//! - 読み取りは `PgPool` から直接、書き込みは [`TxContext`](crate::db::TxContext) 経由
//! - DB 行は中間構造体（`FromRow`）で受け、`TryFrom` でドメイン型に変換する
//! - 不変条件（1 ユーザー 1 エンロールメント、1 エンロールメント 1 住所）は
//!   UNIQUE 制約と `ON CONFLICT ... DO UPDATE` で守る

pub mod address_repository;
pub mod enrollment_repository;
pub mod ticket_repository;

pub use address_repository::{AddressRepository, PostgresAddressRepository};
pub use enrollment_repository::{EnrollmentRepository, PostgresEnrollmentRepository};
pub use ticket_repository::{PostgresTicketRepository, TicketRepository};
