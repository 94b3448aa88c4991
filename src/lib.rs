//! Library crate for wild-card-score, exposing modules for the binary and integration tests.

pub mod bot;
pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
