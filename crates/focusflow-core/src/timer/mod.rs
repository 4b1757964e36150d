mod clock;
mod completion;
mod credit;
mod phase;
mod session;

pub use clock::{ClockState, SessionClock};
pub use completion::{CompletionEvaluator, CompletionOutcome};
pub use credit::{CreditInput, CreditPolicy};
pub use phase::{Phase, PhaseController};
pub use session::FocusSession;
