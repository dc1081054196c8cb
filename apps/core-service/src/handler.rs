//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ロジックはユースケースに委譲
//! - ユーザーはゲートウェイで認証済みとし、`user_id` クエリで受け取る

pub mod enrollment;
pub mod health;
pub mod ticket;

pub use enrollment::{EnrollmentState, get_address_from_cep, get_enrollment, upsert_enrollment};
pub use health::{ReadinessState, health_check, readiness_check};
use serde::Deserialize;
pub use ticket::{TicketState, create_ticket, get_ticket, list_ticket_types};
use uuid::Uuid;

/// ユーザー ID クエリパラメータ
#[derive(Debug, Deserialize)]
pub struct UserQuery {
   pub user_id: Uuid,
}
