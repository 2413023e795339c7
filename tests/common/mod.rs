//! Integration test common infrastructure.
//!
//! Provides a tracing layer that captures log events, interaction builders
//! and small commands for exercising the dispatch pipeline.

#![allow(dead_code)]

pub mod fixtures;
pub mod logs;

#[allow(unused_imports)]
pub use fixtures::{Panics, Replies, invocation, targeting};
#[allow(unused_imports)]
pub use logs::{CapturedEvent, LogCapture};
