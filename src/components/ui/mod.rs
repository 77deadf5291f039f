pub mod button;
pub mod separator;

pub use button::*;
pub use separator::*;
