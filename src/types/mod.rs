pub mod error;
pub mod form;
pub mod id;
pub mod pagination;

pub use error::Error;
pub use pagination::Pagination;
