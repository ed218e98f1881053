//! # Blossom Core Library
//!
//! This library provides the core logic for Blossom, a hormonal wellness
//! companion. It follows a CLI-first philosophy: every operation is
//! available through the standalone `blossom` binary, and any richer front
//! end is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Cycle**: cycle-day arithmetic and phase classification
//! - **Symptoms**: the append-only symptom log, stamped with cycle position
//! - **Stats**: pattern detection and trend aggregates over the log
//! - **Chat**: the companion conversation, with a language model backend and
//!   a deterministic fallback
//! - **Storage**: SQLite persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`Session`]: profile, log and conversation for one user
//! - [`PatternAnalyzer`]: phase/symptom intensity patterns
//! - [`ConversationEngine`]: reply generation
//! - [`Database`]: persistence
//! - [`Config`]: application configuration management

pub mod chat;
pub mod cycle;
pub mod error;
pub mod export;
pub mod insights;
pub mod profile;
pub mod session;
pub mod stats;
pub mod storage;
pub mod symptoms;

pub use chat::{ChatBackend, ConversationEngine, ConversationMessage, OllamaBackend, PromptContext, Reply, ReplySource, Role};
pub use cycle::{classify_phase, cycle_day, CyclePosition, Phase};
pub use error::{ConfigError, CoreError, DatabaseError, ExportError, ValidationError};
pub use export::ExportFormat;
pub use insights::InsightGenerator;
pub use profile::{OnboardingForm, UserProfile};
pub use session::{LogOutcome, Session, SessionManager};
pub use stats::{PatternAnalyzer, PatternReport, TrendReport, Trends};
pub use storage::{Config, Database};
pub use symptoms::{Intensity, Symptom, SymptomEntry, SymptomLog};
