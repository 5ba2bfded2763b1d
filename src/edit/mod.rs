//! Buffer mutation: the byte-span primitive and the snippet layer on top.
//!
//! All edit operations compile down to a single primitive: [`ByteEdit`], a
//! validated byte-span replacement over a session's buffer. Intelligence
//! lives in span acquisition (snippet search, enclosing-node constraints),
//! not in the application logic.

pub mod byte;
pub mod errors;
pub mod node;

pub use byte::{ByteEdit, EditReport};
pub use errors::EditError;
pub use node::{NodeEdit, NodeEditOptions};
