pub use self::errors::*;
pub use self::pqr_tree::*;

mod errors;
mod node;
mod pqr_tree;
mod reduction;
mod siblings;
mod union_find;
