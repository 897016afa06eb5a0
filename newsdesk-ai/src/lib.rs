//! LLM clients for the Newsdesk pipeline
//!
//! Wraps the hosted chat-completion API behind typed calls:
//! - standard article classification (deterministic, strict schema)
//! - enhanced classification and executive summaries
//! - Instagram caption/hashtag generation with per-category styling

pub mod classifier;
pub mod client;
pub mod enhanced;
pub mod instagram;
pub mod prompts;

pub use client::OpenAiClient;
pub use instagram::{category_style, CategoryStyle, GenerationInput, InstagramContent};
pub use prompts::{default_category_prompt, normalize_prompt_category, PROMPT_CATEGORIES};
