pub mod adjust;
pub mod clock;
pub mod effects;
pub mod phase;
pub mod session;
