// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `inlay`.
//!
//! - The `util` module contains the demo frame set, the fixture font and instrumented content
//!   providers shared by different tests.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, so that shared utilities only need defining once.
//! - New tests go into the module for their topic (document, font, resolve, animation, render).
//!   End-to-end walkthroughs of the public API live in `basic.rs`. Put the topic at the
//!   start of the test name, e.g. `render_mount_failure_is_blank`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod basic;
mod util;
