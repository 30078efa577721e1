//! Topic naming and inbound routing.
//!
//! All devices share one topic namespace rooted at a base topic:
//!
//! ```text
//! {base}/pub            directory broadcast (public room announcements)
//! {base}/room/{roomId}  one shared channel per room, used by all members
//! ```
//!
//! Routing is structural only. There is no registry of valid rooms on the
//! bus; a room topic is any topic under `{base}/room/` whose final segment is
//! non-empty.

/// Final path segment of the directory broadcast topic.
const DIRECTORY_SEGMENT: &str = "pub";

/// Path segment introducing per-room topics.
const ROOM_SEGMENT: &str = "room";

/// Where an inbound delivery should be routed, derived from its topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Directory broadcast channel: payload is an announcement.
    Directory,
    /// Room channel: payload is a room message for the given room id.
    Room(String),
    /// Topic outside this namespace; the delivery is ignored.
    Foreign,
}

/// Topic namespace rooted at a configurable base topic.
///
/// The base topic doubles as a coarse protocol version: incompatible
/// deployments pick a different base and never see each other's traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpace {
    base: String,
}

impl TopicSpace {
    /// Create a topic space rooted at `base` (e.g. `"banter_v1"`).
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// The base topic this namespace is rooted at.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Topic of the shared directory broadcast channel.
    pub fn directory(&self) -> String {
        format!("{}/{DIRECTORY_SEGMENT}", self.base)
    }

    /// Topic of a specific room's channel.
    pub fn room(&self, room_id: &str) -> String {
        format!("{}/{ROOM_SEGMENT}/{room_id}", self.base)
    }

    /// Classify an inbound topic.
    ///
    /// The room id is the final path segment; everything the namespace does
    /// not recognize routes to [`Route::Foreign`].
    pub fn route(&self, topic: &str) -> Route {
        let Some(rest) = topic.strip_prefix(self.base.as_str()) else {
            return Route::Foreign;
        };
        let Some(rest) = rest.strip_prefix('/') else {
            return Route::Foreign;
        };

        if rest == DIRECTORY_SEGMENT {
            return Route::Directory;
        }

        match rest.split_once('/') {
            Some((ROOM_SEGMENT, room_id)) if !room_id.is_empty() && !room_id.contains('/') => {
                Route::Room(room_id.to_string())
            },
            _ => Route::Foreign,
        }
    }
}
