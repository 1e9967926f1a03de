pub mod enums;
pub mod medication;
pub mod reminder;

pub use enums::*;
pub use medication::*;
pub use reminder::*;
