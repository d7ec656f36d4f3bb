pub mod precision;
pub mod vec;

pub use precision::*;
pub use vec::*;
