// Library surface for the binary, headless integration tests and other hosts.
pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod scorer;
pub mod session;
pub mod timer;
pub mod ui;
pub mod word_source;

pub use controller::{SessionController, StateChange};
pub use session::{Session, Status};
