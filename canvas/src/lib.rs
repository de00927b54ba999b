//! Zone layout and interaction engine for the photobook editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and is also
//! linked natively by the service crate. It owns the editing side of a page:
//! translating raw DOM pointer and key events into zone geometry, previewing
//! gestures directly on the DOM, and committing exactly one document mutation
//! per gesture. The host is responsible only for wiring DOM events to the
//! engine and persisting the resulting [`engine::Action::Commit`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Pages, zones, elements, layouts and the in-memory store |
//! | [`geometry`] | Pure drag / resize / draw rectangle math |
//! | [`viewport`] | Client pixel to page percent conversion |
//! | [`input`] | Input event types, selection and the gesture state machine |
//! | [`hit`] | Hit-testing against zones and resize handles |
//! | [`validate`] | Zone input validation |
//! | [`page_builder`] | Bulk layout assignment for multi-page templates |
//! | [`consts`] | Shared numeric constants (minimum sizes, thresholds) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod page_builder;
pub mod validate;
pub mod viewport;
