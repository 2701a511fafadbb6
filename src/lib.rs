//! Flowbot - Scripted customer-service conversation engine
//!
//! A step DSL describes the conversation graph; the engine walks it per
//! session, consulting an intent classifier when keyword matching fails and
//! enforcing a dual-timeout silence policy while listening.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
