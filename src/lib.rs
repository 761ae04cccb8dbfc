//! procsys - BEAM-style process supervision on top of tokio.
//!
//! Every process has a unique identity, a control channel and a user
//! channel, bidirectional fault-propagating links, unidirectional monitors,
//! and an optional `trap_exit` mode that turns fatal exit signals into
//! ordinary messages.
//!
//! # Quick Start
//!
//! ```no_run
//! use procsys::core::Exit;
//! use procsys::core::Term;
//! use procsys::erts::Message;
//! use procsys::erts::SpawnConfig;
//! use procsys::init;
//!
//! let exit = init::block_on(Default::default(), |env| async move {
//!   let handle = env.spawn(
//!     |proc, _args| {
//!       Box::pin(async move {
//!         if let Message::Term(term) = proc.receive().await? {
//!           println!("{} received {term}", proc.this());
//!         }
//!
//!         Ok::<(), Exit>(())
//!       })
//!     },
//!     SpawnConfig::new(),
//!     Vec::new(),
//!   );
//!
//!   let _ignore = handle.pid().send(Term::new("hello")).await;
//!
//!   handle.join().await
//! });
//!
//! assert!(exit.unwrap().is_normal());
//! ```
//!
//! # Core Modules
//!
//! - [`init`]: Runtime bootstrap
//! - [`erts`]: Environment, configuration, signals, and messages
//! - [`proc`]: The process behavior core
//! - [`core`]: Core types (PIDs, references, terms, exit reasons)
//! - [`error`]: Error types
//! - [`consts`]: Default configuration constants

mod loom;
mod utils;

pub mod consts;
pub mod core;
pub mod error;
pub mod erts;
pub mod init;
pub mod proc;
