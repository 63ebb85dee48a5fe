// src/lib.rs

//! Mobile number / CNIC lookup service library

pub mod error;
pub mod models;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod utils;
