//! SocialLab Leads API Library
//!
//! Contact-form lead capture: submissions are validated, stamped with an id
//! and timestamp, stored in PostgreSQL (or memory) and listed back.
//!
//! # Modules
//!
//! - `app`: Router assembly and middleware.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `db_storage`: PostgreSQL lead storage.
//! - `errors`: HTTP error mapping.
//! - `handlers`: HTTP request handlers.
//! - `models`: Lead entity and request/response payloads.
//! - `store`: Lead store trait and in-memory implementation.
//! - `validation`: Submission validation.

pub mod app;
pub mod config;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;
pub mod validation;
