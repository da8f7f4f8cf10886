//! Backend HTTP API

pub mod client;
pub mod domains;
pub mod runtime;
pub mod stacks;

pub use client::HttpClient;
