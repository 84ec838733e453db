//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod agent;
pub mod livraison;
pub mod merchant;
pub mod routine;
pub mod routing;
pub mod user;
