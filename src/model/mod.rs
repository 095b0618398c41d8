pub mod action;
pub mod common;
pub mod filter;
pub mod relations;
pub mod relations_model;

pub use action::*;
pub use common::*;
pub use filter::*;
pub use relations::*;
pub use relations_model::*;
