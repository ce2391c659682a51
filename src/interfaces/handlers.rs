pub mod home;
pub mod system;
pub mod uploads;
pub mod videos;
