mod clock;
mod schedule_clock;

pub use clock::{Clock, SystemClock};
pub use schedule_clock::{format_remaining, next_deadline, remaining};
