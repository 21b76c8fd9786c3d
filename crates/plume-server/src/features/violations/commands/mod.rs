pub mod notify;

pub use notify::{MarkNotifiedCommand, MarkNotifiedError, MarkNotifiedResponse, NotifyTarget};
