// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Corpus-fetching search agent: one request fetches the corpus, builds an
//! in-memory full-text index, runs the query, and groups matches by page.
//!
//! The crate root exposes the application modules so integration tests can
//! assemble the router without starting the binary.

pub mod app;
pub mod models;
pub mod services;
