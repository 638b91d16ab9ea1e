//! Assetlock: path-level exclusive locks for repositories of large,
//! unmergeable files.
//!
//! A lock reserves one normalized path in one repository for one principal.
//! The crate is layered bottom-up:
//!
//! - [`store`]: persistence of lock records with atomic per-path uniqueness
//! - [`manager`]: acquire, list, verify and release rules over any store
//! - [`view`]: the external JSON shapes and error envelope
//!
//! The CLI (`cli`, `commands`) wires them to a file-backed state root whose
//! `config.yaml` doubles as access policy and owner directory.

pub mod access;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod locks;
pub mod manager;
pub mod store;
pub mod view;

#[cfg(test)]
mod test_support;
