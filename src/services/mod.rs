//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación.

pub mod category_cache;

pub use category_cache::{BackendStatus, CategoryCache, CategorySource};
