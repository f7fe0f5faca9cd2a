pub mod summary;
pub mod table;

pub use summary::*;
pub use table::*;
