//! Background job scheduler and job implementations.

mod expire_invites;
mod pool_metrics;
mod rotate_tokens;
mod scheduler;

pub use expire_invites::InviteExpiryJob;
pub use pool_metrics::PoolMetricsJob;
pub use rotate_tokens::TokenRotationJob;
pub use scheduler::JobScheduler;
