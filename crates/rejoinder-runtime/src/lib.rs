//! `rejoinder-runtime` – The Response Orchestrator.
//!
//! Turns user input into a reply by combining a similarity
//! [`Comparator`][rejoinder_compare::Comparator] with the response graph kept
//! by [`ConversationMemory`][rejoinder_memory::ConversationMemory].
//!
//! # Modules
//!
//! - [`chatbot`] – [`ChatBot`][chatbot::ChatBot]: `train` and `get_response`,
//!   the session holding the previous statement, and the
//!   [`Exchange`][chatbot::Exchange] record returned by `get_response_data`.
//! - [`config`] – [`ChatConfig`][config::ChatConfig] and the
//!   [`AdapterKind`][config::AdapterKind] registry used by
//!   [`ChatBot::from_config`][chatbot::ChatBot::from_config].
//!
//! # Example
//!
//! ```rust
//! use rejoinder_runtime::{ChatBot, ChatConfig};
//!
//! let mut bot = ChatBot::from_config(&ChatConfig::default()).unwrap();
//! bot.train(["Hello", "Hi there"]).unwrap();
//!
//! assert_eq!(bot.get_response("Hello!", "user").unwrap(), "Hi there");
//! ```

pub mod chatbot;
pub mod config;

pub use chatbot::{ChatBot, ChatError, Exchange};
pub use config::{AdapterKind, ChatConfig};

pub use rejoinder_compare::{Comparator, ComparatorKind, Language};
pub use rejoinder_memory::{ConversationMemory, Session, TieBreak};
pub use rejoinder_types::Statement;
