pub mod analysis;
pub mod market;
pub mod notification;
pub mod prediction;
pub mod user;

pub use analysis::*;
pub use market::*;
pub use notification::*;
pub use prediction::*;
pub use user::*;
