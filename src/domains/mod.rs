//! Domains module containing business logic organized by bounded contexts.
//!
//! The server currently exposes a single domain, tools, holding both the
//! dispatch machinery and the tool definitions.

pub mod tools;
