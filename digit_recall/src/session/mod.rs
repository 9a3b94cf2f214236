//! Session module hosting one game per async actor.
//!
//! This module implements:
//! - SessionActor: owns a GameStateMachine on its own Tokio task
//! - SessionHandle: cloneable front door for presentation adapters
//! - View change broadcasting to subscribers
//!
//! ## Architecture
//!
//! The actor multiplexes its mpsc inbox with the machine's playback reports,
//! so player intents and timer completions are applied one at a time on a
//! single task. Adapters never touch the machine directly.
//!
//! ## Example
//!
//! ```no_run
//! use digit_recall::config::EngineConfig;
//! use digit_recall::game::GameStateMachine;
//! use digit_recall::session::SessionActor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::from_env()?;
//!     let machine = GameStateMachine::new(config.open_store()?, config.timing);
//!     let session = SessionActor::spawn(machine);
//!
//!     let (_, mut views) = session.subscribe(16).await?;
//!     session.start().await?;
//!     session.interrupt().await?;
//!
//!     while let Some(view) = views.recv().await {
//!         println!("{} (streak {})", view.phase, view.current_streak);
//!     }
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod errors;
pub mod messages;

pub use actor::{SessionActor, SessionHandle};
pub use errors::{SessionError, SessionResult};
pub use messages::{SessionId, SessionMessage, SubscriberId};
