//! Chat completion wire types

mod types;

pub use types::*;
