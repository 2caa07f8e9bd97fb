//! Background workers owned by the runtime.

mod tick;

pub(crate) use tick::{Command, TickWorker};
