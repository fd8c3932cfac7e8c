//! AI systems (controller logic)

pub mod chase;
pub mod fsm;
pub mod patrol;

// Re-export all systems
pub use chase::*;
pub use fsm::*;
pub use patrol::*;
