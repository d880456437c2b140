//! Database entity definitions (row mappings).

pub mod attendance;
pub mod club;
pub mod invite;
pub mod profile;
pub mod session;
pub mod user;

pub use attendance::{
    AttendanceEntity, AttendanceStatusDb, AttendanceWithUserEntity, StatusCountsRow,
    UserAttendanceRowEntity,
};
pub use club::{ClubEntity, ClubMembershipEntity, ClubRoleDb, ClubWithMembershipEntity, MemberWithUserEntity};
pub use invite::{ClubInviteEntity, InviteWithClubEntity};
pub use profile::ProfileEntity;
pub use session::{SessionEntity, SessionWithCountEntity};
pub use user::UserEntity;
