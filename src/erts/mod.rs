//! Process environment, configuration, and the messages exchanged between
//! processes.

mod env;
mod message;
mod runtime;
mod signal;
mod spawn;
mod tracer;

pub(crate) use self::signal::SignalRecv;

pub use self::env::Env;
pub use self::env::EnvConfig;
pub use self::env::EnvRef;
pub use self::env::Environment;
pub use self::message::DownMessage;
pub use self::message::ExitMessage;
pub use self::message::Message;
pub use self::runtime::RuntimeConfig;
pub use self::runtime::available_cpus;
pub use self::signal::Signal;
pub use self::signal::SignalDemonitor;
pub use self::signal::SignalExit;
pub use self::signal::SignalLink;
pub use self::signal::SignalLinks;
pub use self::signal::SignalMonitor;
pub use self::signal::SignalMonitorDown;
pub use self::signal::SignalStop;
pub use self::signal::SignalUnlink;
pub use self::spawn::SpawnConfig;
pub use self::spawn::SpawnHandle;
pub use self::tracer::LogTracer;
pub use self::tracer::Tracer;
