pub mod cascade;
pub mod engine;
pub mod filter;
pub mod grouping;
pub mod safety_net;
pub mod slots;

pub use cascade::Cascade;
pub use engine::{Engine, SelectionResult, SelectionRules};
pub use filter::{Candidate, CandidateFilter, Exclusion};
pub use grouping::{DisplayConfig, DisplayGroup, ItemGroup, PresentationGrouper};
pub use safety_net::{EssentialSlot, SafetyNet, SafetyNetConfig};
pub use slots::{OutfitSlots, SelectedItem};
