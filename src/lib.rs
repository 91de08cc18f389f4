//! Plandex CLI - terminal-based AI coding agent.
//!
//! This crate implements the CLI's self-maintenance and process-lifecycle
//! core plus the thin agent-mode surface around it:
//!
//! - [`upgrade`] - the self-update pipeline: release resolution, archive
//!   download and streaming extraction, atomic binary replacement, and
//!   in-place restart with exit-status mirroring
//! - [`exec`] - supervised child execution: process-group spawning and
//!   whole-tree signal forwarding so interrupted sessions never leave
//!   orphans behind
//! - [`agent`] - autonomous agent mode: prompt-driven jobs reported as a
//!   typed event stream, with task commands run through [`exec`]
//! - [`cli`] - clap command definitions and dispatch
//! - [`config`] - injected build-time version and remote endpoints
//! - [`core`] - shared error types and user-friendly error reporting
//!
//! # Self-update flow
//!
//! ```text
//! startup ── check release endpoint (5s bound) ── newer? ── prompt user
//!                                                              │ yes
//!                    download archive → extract binary entry → atomic swap
//!                                                              │
//!                                   re-exec with original args, mirror exit
//! ```
//!
//! Upgrade checks are skipped when `PLANDEX_SKIP_UPGRADE` is set, and every
//! failure before the user confirms leaves the running binary untouched.

pub mod agent;
pub mod cli;
pub mod config;
pub mod core;
pub mod exec;
pub mod upgrade;
