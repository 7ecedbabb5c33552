//! Show acquisition workflow
//!
//! - `store` - snapshot store, tabs, search query input
//! - `controller` - search/grab state machine with per-class locks

pub mod controller;
pub mod store;

pub use controller::{
    AcquisitionController, ActionState, Completion, Effect, FetchCause, Intent, LockPolicy, Phase,
    ShowView,
};
pub use store::{QueryEdit, QueryInput, ShowStore, Tab};
