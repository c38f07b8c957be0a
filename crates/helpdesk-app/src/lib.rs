//! Command-line surface for the hospital helpdesk client.

pub mod commands;
