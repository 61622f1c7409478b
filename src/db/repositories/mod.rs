mod booking_repository;
mod schedule_repository;

pub use booking_repository::BookingRepository;
pub use schedule_repository::ScheduleRepository;
