pub mod body_match;
pub mod params;
pub mod play;
pub mod unauthorized;
pub mod visibility;

pub use body_match::*;
pub use params::*;
pub use play::*;
pub use unauthorized::*;
pub use visibility::*;
