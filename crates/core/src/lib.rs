//! Domain types and pure logic for the Plataforma de Seleção backend.
//!
//! This crate has no database, network, or async dependencies. It provides:
//!
//! - [`error`] -- the shared error taxonomy consumed by the API layer.
//! - [`types`] -- primitive aliases (`DbId`, `Timestamp`).
//! - [`roles`] -- role/status constants and the role → page-menu table.
//! - [`perguntas`] -- question type names for the call-form builder.
//! - [`email`] -- e-mail syntax validation.
//! - [`distribuicao`] -- reviewer/project assignment tallies.
//! - [`convite_massa`] -- bulk-invitation validation pipeline.

pub mod convite_massa;
pub mod distribuicao;
pub mod email;
pub mod error;
pub mod perguntas;
pub mod roles;
pub mod types;
