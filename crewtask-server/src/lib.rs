//! CrewTask API server library.
//!
//! A role-based task/leave/team management backend: a JSON REST surface
//! backed by an authorization-aware task lifecycle engine, with every task
//! mutation pushed in real time over WebSocket connections to exactly the
//! affected users. Exposed as a library so tests can run an in-process
//! server.

pub mod auth;
pub mod clock;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod leaves;
pub mod notify;
pub mod policy;
pub mod projects;
pub mod registry;
pub mod routes;
pub mod server;
pub mod store;
pub mod teams;
pub mod ws;
