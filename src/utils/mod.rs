//! Utilidades del sistema
//!
//! Este módulo contiene el manejo de errores común.

pub mod errors;
