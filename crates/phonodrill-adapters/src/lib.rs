//! phonodrill-adapters — phonemizer and recognizer implementations.
//!
//! Implements the `Phonemizer` trait over a CMU-style pronunciation
//! dictionary (plus a literal fallback for text-only practice), and
//! provides mock collaborators for testing the practice engine without
//! a dictionary file or a speech model.

pub mod cmudict;
pub mod config;
pub mod error;
pub mod literal;
pub mod mock;

pub use cmudict::CmuDictPhonemizer;
pub use config::{create_phonemizer, load_config, load_config_from, PhonemizerConfig, PhonodrillConfig};
pub use error::AdapterError;
pub use literal::LiteralPhonemizer;
pub use mock::{MockPhonemizer, MockRecognizer};
