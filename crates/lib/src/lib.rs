//! SmartMail Insight core library: text extraction, analysis, platform replies,
//! stats and the webhook gateway used by the CLI.

pub mod analysis;
pub mod config;
pub mod extract;
pub mod gateway;
pub mod init;
pub mod llm;
pub mod pipeline;
pub mod platforms;
pub mod stats;
