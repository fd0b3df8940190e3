//! Generates a preset Next.js project skeleton.
//!
//! The project tree is either copied from an external template directory or written from
//! the built-in [`manifest`], then the package descriptor and readme get their placeholder
//! tokens replaced. [`api::create_project`] sequences the whole run.
pub mod api;
pub mod config;
pub mod errors;
pub mod install;
pub mod manifest;
pub mod materialize;
pub mod preview;
pub mod prompt;
pub mod source;
pub mod substitute;
pub mod variables;
