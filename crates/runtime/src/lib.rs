pub mod controller;
pub mod frame;
pub mod input;

pub use controller::*;
pub use frame::*;
pub use input::*;
