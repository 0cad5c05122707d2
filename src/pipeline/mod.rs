pub mod builder;
pub mod crack;
pub mod stage;
pub mod traits;
pub mod types;
pub mod worker;

pub use builder::*;
pub use crack::*;
pub use stage::*;
pub use traits::*;
pub use types::*;
pub use worker::*;
