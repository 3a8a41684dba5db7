pub mod classify;
pub mod client;
pub mod composer;
pub mod config;
pub mod encoding;
pub mod plan_gate;
pub mod prompts;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_support;

pub use client::AnalysisClient;
pub use composer::RequestComposer;
pub use config::{AnalysisConfig, ConfigError};
pub use encoding::FileImageEncoder;
pub use session::{AnalysisSession, GlobalAnalysisParams, StockAnalysisParams};
pub use store::{
    AnalysisSessionStore, ConcurrencyPolicy, Generation, SessionError, SessionSnapshot,
};
