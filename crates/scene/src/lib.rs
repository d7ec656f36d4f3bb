pub mod picking;
pub mod projection;
pub mod view;
pub mod visibility;

pub use picking::*;
pub use projection::*;
pub use view::*;
pub use visibility::*;
