// Session view model: the pure reducer, the in-memory store, and the
// controller that runs reducer effects against the extractor and requester.

pub mod controller;
pub mod handlers;
pub mod state_machine;
pub mod store;

pub use controller::SessionController;
pub use state_machine::{Action, SessionState, ViewState};
pub use store::SessionStore;
