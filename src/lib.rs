//! Revit add-in deployment engine.
//!
//! Reads an INI description of a Revit plugin, detects the Revit versions
//! installed on the host, and writes or removes the `.addin` manifests that
//! register the plugin with each matching version.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: parse and validate the INI add-in description
//! - **[`products`]**: enumerate installed Revit products
//! - **[`deploy`]**: resolve targets, build manifests, install or uninstall
//! - **[`resources`]**: idempotent `check + apply` file primitives
//! - **[`commands`]**: top-level command orchestration (`setup`, `uninst`, browse)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod products;
pub mod resources;
