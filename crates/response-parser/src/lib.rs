pub mod extractor;
pub mod normalizer;
pub mod scanner;
mod metrics;


pub use extractor::*;
pub use metrics::decode_metrics;
pub use normalizer::normalize;
