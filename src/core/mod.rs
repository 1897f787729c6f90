//! Errors, operations, field validation and the intermediate wire tree.

mod error;
mod fields;
mod node;
mod operation;

pub use error::*;
pub use fields::*;
pub use node::*;
pub use operation::*;
