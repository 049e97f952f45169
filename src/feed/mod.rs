//! Feed state containers
//! One container per feed kind, each exclusively owning its in-memory maps.
//! The shared core handles the load state machine, index clamping, and the
//! request-generation guard; the quiz/reel containers add their per-item
//! user state on top.

pub mod quiz;
pub mod reel;
pub mod state;

pub use quiz::QuizFeed;
pub use reel::ReelFeed;
pub use state::FeedPhase;
