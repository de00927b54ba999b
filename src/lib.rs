//! Photobook service: persistence, domain services and the HTTP surface
//! around the `canvas` zone engine.
//!
//! SYSTEM CONTEXT
//! ==============
//! The `canvas` crate owns geometry, gestures and the local document store.
//! This crate owns everything that talks to the outside world:
//!
//! | Module     | Role                                                         |
//! |------------|--------------------------------------------------------------|
//! | `config`   | Environment-driven configuration                             |
//! | `db`       | Postgres pool and migrations                                 |
//! | `error`    | `ErrorCode` trait shared by every error enum                 |
//! | `repo`     | `Repository` trait with Postgres, memory and HTTP backends   |
//! | `services` | Zone, layout and page operations plus `EditorSession`        |
//! | `routes`   | axum router exposing the repository over JSON                |
//! | `state`    | Shared handler state                                         |

pub mod config;
pub mod db;
pub mod error;
pub mod repo;
pub mod routes;
pub mod services;
pub mod state;
