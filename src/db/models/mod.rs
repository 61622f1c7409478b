mod appointment;
mod master;
mod schedule_override;
mod service;
mod work_hours;

pub use appointment::*;
pub use master::*;
pub use schedule_override::*;
pub use service::*;
pub use work_hours::*;
