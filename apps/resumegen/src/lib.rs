//! Resume and cover letter generation: JSON in, HTML and PDF out.
//!
//! The pipeline lives in [`generation::Generator`]; the `resumegen` CLI and the
//! `resumegen-api` server are thin adapters over it.

pub mod config;
pub mod errors;
pub mod generation;
pub mod models;
pub mod pdf;
pub mod render;
pub mod routes;
pub mod state;
pub mod storage;
