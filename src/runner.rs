pub mod api;
pub mod config;
pub mod ds;
pub mod eval;
pub mod host;
