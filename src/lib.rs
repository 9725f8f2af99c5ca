// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! Full-text search over a corpus of scholarly JSON records.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌─────────┐   ┌───────────┐   ┌─────────┐
//! │ tokenizer │──▶│ lexicon  │──▶│ forward │──▶│ inverted  │──▶│ barrel  │
//! │ (§4.1)    │   │ (§4.2)   │   │ (§4.4)  │   │ (§4.5)    │   │ (§4.6)  │
//! └───────────┘   └──────────┘   └─────────┘   └───────────┘   └────┬────┘
//!                       ▲              ▲                             │
//!                       │              │                             ▼
//!                  ┌────┴──────────────┴────┐                  ┌──────────┐
//!                  │        ingest          │◀─────────────────│  search  │
//!                  │  (dynamic indexing)     │                  │ (§4.7)   │
//!                  └────────────┬────────────┘                  └────┬─────┘
//!                               │                                    │
//!                               ▼                                    ▼
//!                  ┌─────────────────────────────────────────────────────┐
//!                  │                       engine                        │
//!                  │     one RwLock-guarded facade over everything       │
//!                  └──────────────────────────┬──────────────────────────┘
//!                                              │
//!                                   ┌──────────┴──────────┐
//!                                   ▼                     ▼
//!                              server (warp)          cli (clap)
//! ```
//!
//! Each module docstring describes its own piece in detail; this overview
//! only exists to orient a reader to how the pieces fit.

pub mod autocomplete;
pub mod barrel;
pub mod config;
pub mod contracts;
pub mod docmap;
pub mod engine;
pub mod error;
pub mod forward;
pub mod ingest;
pub mod inverted;
pub mod lexicon;
pub mod scoring;
pub mod search;
pub mod server;
pub mod tokenizer;
pub mod types;

pub use engine::Engine;
pub use error::{EngineError, Result};
