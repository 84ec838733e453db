//! Controllers de la aplicación
//!
//! Un controller por recurso; reciben sus dependencias del `AppState`
//! en construcción.

pub mod agent_controller;
pub mod livraison_controller;
pub mod merchant_controller;
pub mod report_controller;
pub mod routine_controller;
pub mod routing_controller;
pub mod user_controller;
