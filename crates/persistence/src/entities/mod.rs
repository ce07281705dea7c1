//! Entity definitions (database row mappings).

pub mod admin_user;
pub mod song_request;
pub mod store;
pub mod transaction;
pub mod warp_profile;

pub use admin_user::AdminUserEntity;
pub use song_request::SongRequestEntity;
pub use store::StoreEntity;
pub use transaction::{PaidWarpRow, RevenueSummaryRow, TransactionEntity, TransactionStatusDb};
pub use warp_profile::WarpProfileEntity;
