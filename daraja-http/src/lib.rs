#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async HTTP client for the Safaricom Daraja M-Pesa API.
//!
//! [`DarajaClient`] validates requests with the `daraja` crate, obtains OAuth
//! bearer tokens, POSTs JSON payloads and maps gateway responses into typed
//! results or a [`DarajaError`].
//!
//! # Modules
//!
//! - [`api`] - Object-safe [`MpesaApi`] trait
//! - [`auth`] - Access tokens and the token cache
//! - [`client`] - The [`DarajaClient`] itself
//! - [`constants`] - Endpoint paths and client defaults
//! - [`error`] - Transport and gateway error types
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing spans for every operation

pub mod api;
pub mod auth;
pub mod client;
pub mod constants;
pub mod error;

pub use api::{BoxFuture, MpesaApi};
pub use auth::{AuthToken, TokenCache};
pub use client::DarajaClient;
pub use error::{ApiError, DarajaError};
