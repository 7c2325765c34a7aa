//! Decision engine: placement-density scoring, hunt strategies, target
//! follow-up and the hunt/target state machine that ties them together.

mod agent;
pub mod density;
pub mod follow_up;
pub mod hunt;
mod random;

pub use agent::{AgentConfig, Mode, TargetingAgent};
pub use density::ProbabilityMap;
pub use follow_up::{Orientation, TargetFollowUp};
pub use hunt::{
    CheckerboardStrategy, DensityStrategy, HuntChain, HuntConfig, HuntContext, HuntStrategy,
    ReinforcementStrategy, SequentialStrategy, UniformRandomStrategy,
};
pub use random::random_available;
