//! Shared domain and wire types for the CrewTask API.
//!
//! Everything in this crate is plain serde data: the task, user, leave,
//! team, and project models exchanged over the REST API, and the
//! [`event::ServerEvent`] envelope pushed over the WebSocket channel.
//! Server-side behavior (authorization, lifecycle, fan-out) lives in
//! `crewtask-server`.

pub mod event;
pub mod leave;
pub mod project;
pub mod task;
pub mod team;
pub mod user;
