//! Host-component adapter for the opcon console: the lifecycle/receive
//! boundary a host runtime drives, the console-backed component behind it,
//! and an in-process harness for wiring the two together without a real
//! runtime.

pub mod component;
pub mod config;
pub mod local;

pub use component::{Component, ConsoleComponent};
pub use config::HostConfig;
pub use local::{LocalHost, PublishObserver};
