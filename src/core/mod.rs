//! Core Module - Wallet Risk Engine
//!
//! Normalization, flow and dust analysis, counterparty resolution, scoring
//! and report assembly.

pub mod counterparty;
pub mod dust;
pub mod engine;
pub mod flows;
pub mod normalizer;
pub mod report;
pub mod risk_score;

pub use counterparty::*;
pub use dust::*;
pub use engine::*;
pub use flows::*;
pub use normalizer::*;
pub use report::*;
pub use risk_score::*;
