pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::InMemoryRequestStore;
pub use r#trait::{AttemptOutcome, RequestStore, ThrottleLedger};
