mod row;
pub use row::*;

mod schema;
pub use schema::*;

mod table;
pub use table::*;
