pub mod types;
pub mod filter;
pub mod filter_where;
pub mod evaluate;
pub mod update;
pub mod error;

pub use types::*;
pub use filter::Filter;
pub use update::Update;
pub use error::FilterError;
