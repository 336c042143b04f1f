//! Change events emitted by a store
//!
//! A `ChangeEvent` names which logical facts changed through one or more
//! type tags. Events carry no values; listeners read the new values back
//! from the store with `Store::get()`.

use std::time::Instant;

/// The type tag(s) carried by a change event
///
/// # Example
///
/// ```rust
/// use state_store::ChangeType;
///
/// let single = ChangeType::from("volume");
/// let many = ChangeType::from(vec!["volume", "mute"]);
///
/// assert_eq!(single.tags().collect::<Vec<_>>(), vec!["volume"]);
/// assert_eq!(many.tags().collect::<Vec<_>>(), vec!["volume", "mute"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeType {
    /// A single tag
    Single(String),
    /// An ordered sequence of tags
    Many(Vec<String>),
}

impl ChangeType {
    /// Iterate the tags, treating a single tag as a one-element sequence
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        let tags: &[String] = match self {
            ChangeType::Single(tag) => std::slice::from_ref(tag),
            ChangeType::Many(tags) => tags,
        };
        tags.iter().map(String::as_str)
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        match self {
            ChangeType::Single(_) => 1,
            ChangeType::Many(tags) => tags.len(),
        }
    }

    /// True for an empty `Many` sequence
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for ChangeType {
    fn from(tag: &str) -> Self {
        ChangeType::Single(tag.to_string())
    }
}

impl From<String> for ChangeType {
    fn from(tag: String) -> Self {
        ChangeType::Single(tag)
    }
}

impl From<Vec<&str>> for ChangeType {
    fn from(tags: Vec<&str>) -> Self {
        ChangeType::Many(tags.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for ChangeType {
    fn from(tags: Vec<String>) -> Self {
        ChangeType::Many(tags)
    }
}

/// A change notification delivered to store listeners
///
/// `change_type` is optional because stores are free to emit untyped
/// notifications; consumers decide what an untyped event means to them.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Which facts changed, if the store said so
    pub change_type: Option<ChangeType>,

    /// When the change was emitted
    pub timestamp: Instant,
}

impl ChangeEvent {
    /// Create an event carrying the given tag(s)
    pub fn new(change_type: impl Into<ChangeType>) -> Self {
        Self {
            change_type: Some(change_type.into()),
            timestamp: Instant::now(),
        }
    }

    /// Create an event without any type tag
    pub fn untyped() -> Self {
        Self {
            change_type: None,
            timestamp: Instant::now(),
        }
    }

    /// Iterate the event's tags; empty for an untyped event
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.change_type.iter().flat_map(|change_type| change_type.tags())
    }
}

impl PartialEq for ChangeEvent {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.change_type == other.change_type
    }
}
