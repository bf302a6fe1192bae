mod builder;
pub use builder::*;

mod error;
pub use error::*;

mod select;
pub use select::*;
