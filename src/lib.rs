//! Champion and duo ratings built from daily win/loss logs.
//!
//! The build merges dated `winrate`/`synergy` logs, turns pair win-rates into
//! deltas against a log-odds baseline, deletes champions until every
//! cross-role pair has synergy data, buckets everything into five tiers and
//! writes `game_data.json`.

pub mod analysis;
pub mod api;
pub mod artifact;
pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod logs;
pub mod pipeline;
pub mod role;
