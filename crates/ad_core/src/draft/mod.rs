pub mod session;
pub mod store;

pub use session::{
    DraftSession, DraftSnapshot, PickDirection, PickRecord, DEFAULT_NUM_ROUNDS,
};
pub use store::SessionStore;
