pub mod document;
pub mod edit;
pub mod element;
pub mod usage;

pub use document::*;
pub use edit::*;
pub use element::*;
pub use usage::*;
