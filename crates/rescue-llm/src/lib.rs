//! Generative-language collaborator for the Supply Chain Rescue dashboard.
//!
//! Chat questions and supplier negotiations are delegated to an external
//! model over HTTP. This crate owns the backends, the prompt templates,
//! the strict reply parsing, and the call deadline. Without an API key it
//! answers from canned dashboard responses instead.
//!
//! # Modules
//!
//! - [`client`] -- [`LanguageClient`], the entry point for handlers
//! - [`backend`] -- Gemini, OpenAI-compatible, and Anthropic backends
//! - [`prompt`] -- `minijinja` prompt rendering
//! - [`parse`] -- Strict negotiation reply parsing
//! - [`context`] -- Owned snapshot views quoted in prompts
//! - [`offline`] -- Canned answers for keyless demos
//! - [`error`] -- Collaborator error type

pub mod backend;
pub mod client;
pub mod context;
pub mod error;
pub mod offline;
pub mod parse;
pub mod prompt;

pub use client::{FALLBACK_CHAT_REPLY, LanguageClient};
pub use context::{ChatContext, NegotiationBrief};
pub use error::CollaboratorError;
