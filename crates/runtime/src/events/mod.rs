//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics and consumers subscribe only to
//! the topics they need. Both the authority and remote peers publish through
//! the same paths, so downstream handlers never care which side they run on.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CollectionEvent, RepresentationEvent};
