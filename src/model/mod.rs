pub mod common;
pub mod endpoint;
pub mod envelope;
pub mod example;
pub mod play;
pub mod proxy;

pub use common::*;
pub use endpoint::*;
pub use envelope::*;
pub use example::*;
pub use play::*;
pub use proxy::*;
