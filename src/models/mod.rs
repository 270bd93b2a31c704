// Re-export all model types
pub use self::booking::*;
pub use self::enums::*;
pub use self::errors::*;
pub use self::estimate::*;
pub use self::validation::*;

mod booking;
mod enums;
mod errors;
mod estimate;
mod validation;
