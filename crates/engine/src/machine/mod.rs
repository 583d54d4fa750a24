//! The exploitation state machine.
//!
//! This module defines the vocabulary and structure of the simulated
//! exploitation process. It provides:
//! 1. **States:** Milestones from `target_defined` to
//!    `control_of_code_execution`.
//! 2. **Events:** The attacker actions that move between states.
//! 3. **Facts:** The closed key space of the per-branch assumption table.
//! 4. **Techniques:** Tags identifying the strategy a branch employed.
//! 5. **Transitions:** The static guarded-effect table walked by the
//!    simulator, plus the probability helpers the effects share.

/// Effect functions, one per transition.
pub mod effects;
/// Event (attacker action) identifiers.
pub mod event;
/// Assumption keys.
pub mod fact;
/// Probability helpers shared by effects.
pub mod helpers;
/// State identifiers.
pub mod state;
/// Technique tags.
pub mod technique;
/// The transition table and its lookup surface.
pub mod transition;

pub use event::Event;
pub use fact::Fact;
pub use state::State;
pub use technique::Technique;
pub use transition::{StateMachine, Transition, TransitionId};
