//! Codequiz · multiple-choice coding challenges generated by Gemini.
//!
//! [`generator::ChallengeGenerator`] is the core: one model call, fence
//! cleanup, JSON parse, and the built-in fallback record on any failure.
//! The axum router in [`routes`] hosts it over HTTP.

pub mod config;
pub mod domain;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod util;
