mod orchestrator;
mod store;

pub use orchestrator::{
    NO_PENDING_TASKS_MESSAGE, NotifyError, authenticate, pending_tasks, send_reminder,
};
pub use store::{StoreError, append_reminder, list_reminders};
