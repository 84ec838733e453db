//! Repositorios de acceso a datos
//!
//! Un repositorio por agregado; reciben el pool por inyección en el
//! constructor.

pub mod agent_repository;
pub mod livraison_repository;
pub mod merchant_repository;
pub mod routine_repository;
pub mod routing_repository;
pub mod user_repository;
