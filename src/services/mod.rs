//! Services module
//!
//! Este módulo contiene la lógica de negocio y los colaboradores
//! externos (hébergement de imágenes, mensajería, push, canal en vivo).

pub mod cloudinary_service;
pub mod push_service;
pub mod report_feed;
pub mod report_service;
pub mod whatsapp_service;
