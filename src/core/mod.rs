//! Core process types.

mod types;

pub use self::types::Exit;
pub use self::types::Item;
pub use self::types::Pid;
pub use self::types::Ref;
pub use self::types::Term;
