//! Short, sortable, collision-resistant unique identifiers.
//!
//! An id is a fixed-width big-endian packing of a coarse timestamp, a machine
//! identifier, and a rolling counter, rendered as lowercase hex. Generation is
//! pure computation: once a [`MachineId`] is resolved, [`IdGenerator::next_id`]
//! never blocks, never touches I/O, and never fails.

mod counter;
mod error;
mod generator;
mod hex;
mod id;
mod rand_source;
mod time;
mod validate;

pub use crate::counter::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::rand_source::*;
pub use crate::time::*;
pub use crate::validate::*;
