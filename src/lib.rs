pub mod cave;
pub mod distances;
pub mod pressure;
pub mod valley;

pub use cave::{Cave, NodeId, ParseCaveError};
pub use distances::DistanceTable;
pub use pressure::{best_release, best_release_pair, Partitioned, Searched};
pub use valley::{crossing, Timeline, Valley, ValleyError};
