// Public modules
pub mod arxiv;
pub mod config;
pub mod error;
pub mod latex;
pub mod message;
pub mod models;
pub mod selector;
pub mod slack;
pub mod store;
pub mod summarizer;

// Re-export commonly used types
pub use arxiv::{ArxivClient, PaperSource};
pub use config::Config;
pub use error::{DeliverError, FetchError, StoreError, SummarizeError};
pub use message::{build_payload, NotificationPayload};
pub use models::{PaperRecord, QaPair, SummaryResult};
pub use selector::select_paper;
pub use slack::{ChannelMap, SlackClient};
pub use store::{parse_tag_list, CategoryStore};
pub use summarizer::{create_summarizer, Summarizer};
