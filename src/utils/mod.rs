//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT y cálculo de distancias geográficas.

pub mod errors;
pub mod geo;
pub mod jwt;
pub mod validation;
