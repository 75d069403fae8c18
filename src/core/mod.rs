//! # Core Application Logic
//!
//! This module contains Psalter's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Library (psalm data) │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │   Server   │
//!             │  Adapter   │          │  (/api/    │
//!             │ (ratatui)  │          │   search)  │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`text`]: Psalm, verses and tokens
//! - [`study`]: Study records and their text helpers
//! - [`library`]: Loads the study tables and answers lookups
//! - [`selection`]: What is selected, and the highlight keys
//! - [`sheet`]: The bottom sheet and its drag rules
//! - [`search`]: Keyword filter
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum, everything that can happen in the app
//! - [`config`] / [`preferences`]: The only modules here that touch the disk

pub mod action;
pub mod config;
pub mod library;
pub mod preferences;
pub mod search;
pub mod selection;
pub mod sheet;
pub mod state;
pub mod study;
pub mod text;
