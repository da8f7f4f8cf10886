//! Routing layer clients

pub mod proxy;

pub use proxy::ProxyRouter;
