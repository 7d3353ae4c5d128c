//! Controladores
//!
//! Traducen las operaciones del servicio de categorías al sobre de respuesta.

pub mod category_controller;

pub use category_controller::CategoryController;
