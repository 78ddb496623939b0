// List page building blocks. No widget toolkit: the shell is a view model
// and the frame renders as text.
pub mod list_shell;
pub mod table_frame;

pub use list_shell::ListShell;
pub use table_frame::TableFrame;
