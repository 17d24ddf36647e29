//! Waiting-list desk client library.
//! This crate exposes internal modules for integration testing.
//! The binary entry point is in main.rs.

pub mod board;
pub mod client;
pub mod config;
pub mod desk;
pub mod error;
pub mod models;
pub mod ordering;
pub mod render;
pub mod service;
