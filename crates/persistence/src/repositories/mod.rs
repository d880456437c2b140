//! Repository implementations for database access.

pub mod attendance;
pub mod club;
pub mod invite;
pub mod profile;
pub mod session;
pub mod user;

pub use attendance::AttendanceRepository;
pub use club::ClubRepository;
pub use invite::InviteRepository;
pub use profile::ProfileRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
