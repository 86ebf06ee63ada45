//! # Script Research
//!
//! Research aggregation and adequacy scoring for long-form script generation.
//!
//! Raw sources arrive from two independent producers (live web research and
//! user-uploaded documents). This crate deduplicates overlapping material,
//! scores each source, merges everything into one ranked corpus, and decides
//! whether that corpus can support a script of a target duration.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐
//! │ web search │──┐   ┌──────────────────────────┐   ┌────────────┐
//! └────────────┘  ├──▶│ merge                     │──▶│ adequacy   │──▶ go / no-go
//! ┌────────────┐  │   │ normalize → dedup → score │   │ validation │
//! │ documents  │──┘   │ → rank → truncate         │   └────────────┘
//! └────────────┘      └──────────────────────────┘
//! ```
//!
//! Every core function is synchronous and pure: no I/O, no shared state, safe
//! to call concurrently for independent research sessions.
//!
//! ## Quick Start
//!
//! ```bash
//! research merge --web web.json --docs docs.json
//! research validate --input merged.json --duration 45
//! research check --web web.json --docs docs.json --duration 60
//! research serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Wire records and typed sources |
//! | [`text`] | Normalization, fingerprints, Jaccard |
//! | [`thresholds`] | Tunable constants and the requirement table |
//! | [`quality`] | Per-source quality score |
//! | [`similarity`] | Pairwise source similarity |
//! | [`dedup`] | Duplicate detection across populations |
//! | [`merge`] | Ranked corpus construction |
//! | [`adequacy`] | Duration-based validation |
//! | [`pipeline`] | Merge then validate in one call |
//! | [`config`] | TOML configuration |
//! | [`input`] | Reading source files |
//! | [`report`] | CLI rendering |
//! | [`server`] | JSON HTTP surface |

pub mod adequacy;
pub mod config;
pub mod dedup;
pub mod input;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod server;
pub mod similarity;
pub mod text;
pub mod thresholds;

pub use adequacy::{calculate_adequacy_percentage, validate_research_for_duration, ValidationResult};
pub use merge::{merge_research_sources, MergeOptions, MergeResult};
pub use models::{Origin, Source, SourceKind, SourceRecord};
pub use pipeline::{assess, Assessment};
