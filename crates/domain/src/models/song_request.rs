//! Song request domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Display metadata attached to a warp transaction.
///
/// A song request is only shown while its transaction is paid and the
/// current time falls within `[display_from, display_until]`. The window
/// is opened when the transaction transitions to paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SongRequest {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub store_id: Uuid,
    pub title: String,
    pub artist: Option<String>,
    pub message: Option<String>,
    pub display_from: Option<DateTime<Utc>>,
    pub display_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SongRequest {
    /// Whether the request is inside its display window at `now`.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        match (self.display_from, self.display_until) {
            (Some(from), Some(until)) => from <= now && now <= until,
            _ => false,
        }
    }
}

/// Song request fields supplied at checkout.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SongRequestInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 200, message = "Artist must be at most 200 characters"))]
    pub artist: Option<String>,

    #[validate(length(max = 500, message = "Message must be at most 500 characters"))]
    pub message: Option<String>,
}

/// Response payload for visible song requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SongRequestResponse {
    pub id: Uuid,
    pub title: String,
    pub artist: Option<String>,
    pub message: Option<String>,
    pub display_until: Option<DateTime<Utc>>,
}

impl From<SongRequest> for SongRequestResponse {
    fn from(r: SongRequest) -> Self {
        Self {
            id: r.id,
            title: r.title,
            artist: r.artist,
            message: r.message,
            display_until: r.display_until,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn song_request(from: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> SongRequest {
        SongRequest {
            id: Uuid::new_v4(),
            transaction_id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            title: "Test Song".to_string(),
            artist: None,
            message: None,
            display_from: from,
            display_until: until,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_visible_inside_window() {
        let now = Utc::now();
        let request = song_request(
            Some(now - Duration::minutes(1)),
            Some(now + Duration::minutes(10)),
        );
        assert!(request.is_visible_at(now));
    }

    #[test]
    fn test_not_visible_before_window() {
        let now = Utc::now();
        let request = song_request(
            Some(now + Duration::minutes(1)),
            Some(now + Duration::minutes(10)),
        );
        assert!(!request.is_visible_at(now));
    }

    #[test]
    fn test_not_visible_after_window() {
        let now = Utc::now();
        let request = song_request(
            Some(now - Duration::minutes(20)),
            Some(now - Duration::minutes(1)),
        );
        assert!(!request.is_visible_at(now));
    }

    #[test]
    fn test_not_visible_without_window() {
        // Window is only set once the transaction is paid
        let request = song_request(None, None);
        assert!(!request.is_visible_at(Utc::now()));
    }

    #[test]
    fn test_input_validation() {
        let input = SongRequestInput {
            title: "Song".to_string(),
            artist: Some("Artist".to_string()),
            message: None,
        };
        assert!(input.validate().is_ok());

        let empty_title = SongRequestInput {
            title: String::new(),
            artist: None,
            message: None,
        };
        assert!(empty_title.validate().is_err());
    }
}
