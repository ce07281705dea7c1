//! Domain model definitions.

pub mod admin_user;
pub mod leaderboard;
pub mod song_request;
pub mod store;
pub mod transaction;
pub mod warp_profile;

pub use admin_user::{AdminRole, AdminUser};
pub use leaderboard::{ActivityEntry, LeaderboardEntry, PaidWarp};
pub use song_request::{SongRequest, SongRequestInput, SongRequestResponse};
pub use store::{CreateStoreRequest, Store, StoreResponse};
pub use transaction::{
    CheckStatusResponse, CreateWarpRequest, CreateWarpResponse, Transaction, TransactionResponse,
    TransactionStatus,
};
pub use warp_profile::{
    CreateWarpProfileRequest, UpdateWarpProfileRequest, WarpProfile, WarpProfileResponse,
};
