#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the Safaricom Daraja M-Pesa API.
//!
//! This crate holds everything that happens before a transaction request
//! reaches the network: environment resolution, configuration, security
//! credential derivation, per-operation validation and the wire types
//! exchanged with the gateway. It performs no I/O; the HTTP client lives in
//! `daraja-http`.
//!
//! # Overview
//!
//! A transaction goes through a linear pipeline:
//!
//! 1. the caller builds a request (for example [`request::B2cRequest`]);
//! 2. [`request::Validate::validate`] normalizes it in place and rejects
//!    malformed values;
//! 3. operations that need it derive a [`credential::SecurityCredential`]
//!    from the initiator password;
//! 4. the request is turned into its wire payload (see [`proto`]).
//!
//! # Modules
//!
//! - [`callback`] - Parsing of STK push result callbacks
//! - [`config`] - Consumer credentials and environment selection
//! - [`credential`] - RSA encryption of initiator passwords
//! - [`environment`] - Sandbox / production resolution
//! - [`error`] - Configuration, validation and credential errors
//! - [`phone`] - Phone number normalization
//! - [`proto`] - Wire payloads and responses
//! - [`request`] - Per-operation request validators
//! - [`timestamp`] - Gateway timestamps
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation

pub mod callback;
pub mod config;
pub mod credential;
pub mod environment;
pub mod error;
pub mod phone;
pub mod proto;
pub mod request;
pub mod timestamp;

pub use config::DarajaConfig;
pub use credential::{CredentialEncryptor, SecurityCredential};
pub use environment::Environment;
pub use error::{ConfigError, CredentialError, InvalidEnvironment, ValidationError};
pub use phone::PhoneNumber;
