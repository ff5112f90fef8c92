pub mod breaker;
pub mod reminder;
pub mod task;

#[allow(unused_imports)]
pub use breaker::{BreakerSnapshot, BreakerState, HealthResponse};
#[allow(unused_imports)]
pub use reminder::{ListRemindersResponse, Reminder, ReminderResponse, ReminderSummary};
#[allow(unused_imports)]
pub use task::{PendingTasksResponse, Task};
