pub mod errors;
pub mod metrics;
pub mod pagination;
pub mod shutdown;

pub use errors::*;
pub use pagination::*;
pub use shutdown::*;
