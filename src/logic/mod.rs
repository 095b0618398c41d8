pub mod compare;
pub mod diff;
pub mod merge;
pub mod relations;
pub mod relations_model;

pub use compare::*;
pub use diff::*;
pub use merge::*;
pub use relations::*;
pub use relations_model::*;
