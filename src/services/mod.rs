//! Domain services used by the HTTP routes and by editor sessions.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and multi-step persistence so route
//! handlers stay focused on protocol translation. Every function takes
//! `&dyn Repository` and works the same over any backend.

pub mod editor;
pub mod layout;
pub mod page;
pub mod zone;
