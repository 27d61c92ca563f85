//! Shared test doubles for the Rendezvous peer coordination layer.

mod clock;
mod events;
mod token;

pub use clock::{FixedClock, ManualClock};
pub use events::{EventRecorder, RecordedEvent, RecordedEvents};
pub use token::{PanickingTokens, SequenceTokens};
