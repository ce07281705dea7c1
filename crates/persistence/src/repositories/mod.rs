//! Repository implementations.

pub mod admin_user;
pub mod song_request;
pub mod store;
pub mod transaction;
pub mod warp_profile;

pub use admin_user::AdminUserRepository;
pub use song_request::SongRequestRepository;
pub use store::StoreRepository;
pub use transaction::{NewSongRequest, TransactionRepository};
pub use warp_profile::WarpProfileRepository;
