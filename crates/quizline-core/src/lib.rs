//! quizline-core — Session engine, question bank, and ledgers.
//!
//! This crate defines the question model, the timed session state machine,
//! and the file-backed stores (score ledger, version ledger, credentials)
//! that the rest of quizline builds on.

mod atomic;

pub mod auth;
pub mod config;
pub mod countdown;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod ledger;
pub mod model;
pub mod parser;
pub mod review;
pub mod session;
pub mod statistics;
pub mod versions;
