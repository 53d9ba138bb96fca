//! Camp registration — wizard orchestration and conditional-branch
//! aggregation engine.

pub mod config;
pub mod draft;
pub mod error;
pub mod fields;
pub mod nav;
pub mod questions;
pub mod routes;
pub mod submit;
pub mod transport;
pub mod verify;
pub mod wizard;
