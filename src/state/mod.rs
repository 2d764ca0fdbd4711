// State management module.
// Session controller, async dispatch back to the UI thread, and the screen view model.

pub mod cards;
pub mod console;
pub mod dispatch;
pub mod input;
pub mod session;
pub mod view;

pub use cards::SelectableList;
pub use console::ConsoleLevel;
pub use dispatch::{UiInbox, ui_channel};
pub use input::TextInput;
pub use session::{Operation, SelectionMode, SessionController, SessionState};
pub use view::ScreenView;
