//! # portfolio-chatbot
//!
//! A small HTTP service that answers questions about a portfolio with
//! retrieval-augmented generation.
//!
//! ## Request flow
//!
//! ```text
//!   POST /chatbot {message}
//!            │
//!            ▼
//!   ┌──────────────────────┐   history empty?  ──yes──┐
//!   │ Rephrase with history│                          │
//!   │ (LLM: standalone Q)  │                          │
//!   └──────────┬───────────┘                          │
//!              └──────────────┬───────────────────────┘
//!                             ▼
//!                ┌──────────────────────────┐
//!                │ Embed query, cosine k-NN │  k = 3
//!                └────────────┬─────────────┘
//!                             ▼
//!                ┌──────────────────────────┐
//!                │ Stuff chunks into prompt │
//!                │ LLM answer               │
//!                └────────────┬─────────────┘
//!                             ▼
//!                ┌──────────────────────────┐
//!                │ Append to history (≤ 20) │
//!                └──────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for port, providers, index and history
//! - [`models`] - Shared data types: `Document`, `ChatMessage`, request/response bodies
//! - [`documents`] - Text, JSON and PDF loaders with a placeholder fallback
//! - [`chunking`] - Recursive character splitter (500 chars, 100 overlap)
//! - [`llm`] - Chat-completion and embedding clients behind `ChatModel` / `Embedder`
//! - [`search`] - Persisted vector store and the open-or-build startup step
//! - [`rag`] - Rephrase/retrieve/answer pipeline, lazy pipeline slot, chat history
//! - [`api`] - Axum handlers and router
//! - [`state`] - Shared application state injected into handlers

pub mod api;
pub mod chunking;
pub mod config;
pub mod documents;
pub mod error;
pub mod llm;
pub mod models;
pub mod rag;
pub mod search;
pub mod state;
