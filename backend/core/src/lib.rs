pub mod error;
pub mod traits;
pub mod types;

pub use error::{WatchError, WatchResult};
pub use traits::ChatPlatform;
pub use types::{display_name, ActivityRecord, ChatId, MemberId, MemberStatus, Sighting};

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
