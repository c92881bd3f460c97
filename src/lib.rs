//! # Rigveda Explorer
//!
//! An HTTP backend for reading verses of the Rigveda.
//!
//! Verses are fetched from the VedaWeb linguistic database, normalized into a
//! flat record with Devanagari text, transliteration, translation and hymn
//! metadata, and can be accompanied by AI-generated commentary from an
//! OpenAI-compatible language-model API.
//!
//! ## Architecture
//!
//! ```text
//!                ┌──────────────┐   GET /document/id/MMSSSRR   ┌──────────┐
//!   /api/verse ─▶│ lookup +     │─────────────────────────────▶│ VedaWeb  │
//!                │ normalize    │                              └──────────┘
//!                └──────────────┘
//!                ┌──────────────┐   POST /chat/completions     ┌──────────┐
//! /api/explain ─▶│ commentary   │─────────────────────────────▶│   LLM    │
//! /api/signif. ─▶│              │                              └──────────┘
//!                └──────────────┘
//! ```
//!
//! Handlers are stateless: one outbound call per request, no retries, no
//! caching, no persistence.
//!
//! ## Quick Start
//!
//! ```bash
//! rv serve                      # start the HTTP API
//! rv verse 1 1 1                # print a normalized verse
//! rv explain 10 129 1           # verse plus AI explanation
//! rv samples                    # list well-known verses
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Error taxonomy and HTTP mapping |
//! | [`models`] | Verse coordinates and the normalized verse record |
//! | [`normalize`] | VedaWeb document → verse record |
//! | [`vedaweb`] | VedaWeb HTTP client |
//! | [`lookup`] | Validate, fetch, normalize |
//! | [`llm`] | Chat completions client |
//! | [`commentary`] | Explanation and significance prompts |
//! | [`samples`] | Sample verses and hymn counts |
//! | [`server`] | HTTP API |

pub mod commentary;
pub mod config;
pub mod error;
pub mod llm;
pub mod lookup;
pub mod models;
pub mod normalize;
pub mod samples;
pub mod server;
pub mod vedaweb;
