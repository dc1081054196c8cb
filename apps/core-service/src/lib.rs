//! # Core Service ライブラリ
//!
//! Core Service のルーター・ハンドラ・ユースケースを公開する。
//! `main.rs` と結合テスト（`tests/`）の両方から利用する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
