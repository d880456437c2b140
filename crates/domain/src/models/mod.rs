//! Domain model definitions.

pub mod attendance;
pub mod club;
pub mod invite;
pub mod profile;
pub mod session;
pub mod user;

pub use attendance::{Attendance, AttendanceStatus};
pub use club::{Club, ClubMembership, ClubRole};
pub use invite::ClubInvite;
pub use profile::Profile;
pub use session::AttendanceSession;
pub use user::User;
