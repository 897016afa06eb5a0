//! Pipeline services for Newsdesk
//!
//! This crate provides the service layer between the feed/LLM clients and
//! the HTTP surface: SQLite persistence, the three pipeline stages
//! (ingest, classify, generate) and the daily workflow runner.

pub mod batch;
pub mod classify;
pub mod ingest;
pub mod instagram;
pub mod store;
pub mod workflow;

pub use batch::process_in_batches;
pub use classify::{ClassifyService, ClassifySummary};
pub use ingest::{IngestConfig, IngestService, IngestSummary, PreviewArticle};
pub use instagram::{GenerationOutcome, GenerateSummary, InstagramService};
pub use store::{ArticleStore, StoreError};
pub use workflow::{
    HttpStageInvoker, Stage, StageInvoker, WorkflowResults, WorkflowRunner,
};
