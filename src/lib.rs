//! # funicular - mruby bytecode builds for Funicular apps
//!
//! Compiles a Funicular source tree (`app/funicular`) into one `.mrb`
//! artifact with `picorbc`, keeps it fresh while sources change, and lists
//! the routes declared in `initializer.rb`.
//!
//! ## Quick Start
//!
//! ```bash
//! # One-off build
//! funicular build
//!
//! # Rebuild on every change
//! funicular watch
//!
//! # Show the route table
//! funicular routes
//! ```
//!
//! ## Module Organization
//!
//! - [`sources`] - Source discovery and load-order rules
//! - [`toolchain`] - `picorbc` resolution and version checks
//! - [`build`] - Artifact builds and single-flight rebuilds
//! - [`routes`] - Route declaration parser
//! - [`config`] - Configuration parsing (`funicular.toml`)

/// Artifact builds, rebuild coordination and file watching.
pub mod build;

/// Configuration file parsing (`funicular.toml`).
pub mod config;

/// Error types for fatal build failures.
pub mod error;

/// Route declarations in `initializer.rb`.
pub mod routes;

/// Source discovery and ordering.
pub mod sources;

/// Tracing subscriber setup.
pub mod telemetry;

/// `picorbc` discovery and version checks.
pub mod toolchain;

/// Terminal UI utilities (tables).
pub mod ui;

pub use error::{Error, Result};
