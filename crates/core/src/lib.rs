//! Core state machines for the opcon console: the history-editable input
//! line, the scrollback transcript, the line-observer dispatcher, and the
//! types shared with host-component adapters.

pub mod dispatch;
pub mod event;
pub mod input;
pub mod surface;
pub mod transcript;

pub use dispatch::{DispatchError, Dispatcher, LineObserver};
pub use event::Event;
pub use input::InputLine;
pub use surface::{ConsoleHandle, ConsoleMsg};
pub use transcript::Transcript;
