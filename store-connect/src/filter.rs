//! Change filtering
//!
//! Decides whether a change event warrants a re-render. A connector
//! without a property map re-renders on every change. A connector with one
//! re-renders only when one of the event's tags is a key of the map, and
//! treats an untyped event as a usage error on the store's part.

use state_store::ChangeEvent;

use crate::error::{ConnectError, Result};
use crate::property_map::PropertyMap;

/// Decide whether `event` should trigger a re-render
///
/// # Example
///
/// ```rust
/// use state_store::ChangeEvent;
/// use store_connect::{filter::should_render, PropertyMap};
///
/// let map = PropertyMap::new().prop("volume", "value");
///
/// assert!(should_render(&ChangeEvent::new("volume"), Some(&map)).unwrap());
/// assert!(!should_render(&ChangeEvent::new("mute"), Some(&map)).unwrap());
/// assert!(should_render(&ChangeEvent::new("mute"), None).unwrap());
/// assert!(should_render(&ChangeEvent::untyped(), Some(&map)).is_err());
/// ```
pub fn should_render(event: &ChangeEvent, property_map: Option<&PropertyMap>) -> Result<bool> {
    let map = match property_map {
        Some(map) if !map.is_empty() => map,
        _ => return Ok(true),
    };

    let change_type = event
        .change_type
        .as_ref()
        .ok_or(ConnectError::MissingChangeType)?;

    Ok(change_type.tags().any(|tag| map.contains_key(tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> PropertyMap {
        PropertyMap::new().prop("volume", "value").literal("label", "Volume")
    }

    #[test]
    fn test_no_map_always_renders() {
        assert!(should_render(&ChangeEvent::new("anything"), None).unwrap());
        assert!(should_render(&ChangeEvent::untyped(), None).unwrap());
    }

    #[test]
    fn test_empty_map_always_renders() {
        let empty = PropertyMap::new();
        assert!(should_render(&ChangeEvent::new("anything"), Some(&empty)).unwrap());
        assert!(should_render(&ChangeEvent::untyped(), Some(&empty)).unwrap());
    }

    #[test]
    fn test_single_tag() {
        assert!(should_render(&ChangeEvent::new("volume"), Some(&map())).unwrap());
        assert!(!should_render(&ChangeEvent::new("mute"), Some(&map())).unwrap());
    }

    #[test]
    fn test_any_tag_in_sequence_matches() {
        let event = ChangeEvent::new(vec!["mute", "bass", "label"]);
        assert!(should_render(&event, Some(&map())).unwrap());

        let event = ChangeEvent::new(vec!["mute", "bass"]);
        assert!(!should_render(&event, Some(&map())).unwrap());
    }

    #[test]
    fn test_empty_sequence_never_matches() {
        let event = ChangeEvent::new(Vec::<String>::new());
        assert!(!should_render(&event, Some(&map())).unwrap());
    }

    #[test]
    fn test_literal_keys_count_as_interest() {
        assert!(should_render(&ChangeEvent::new("label"), Some(&map())).unwrap());
    }

    #[test]
    fn test_untyped_event_with_map_is_an_error() {
        let err = should_render(&ChangeEvent::untyped(), Some(&map())).unwrap_err();
        assert!(matches!(err, ConnectError::MissingChangeType));
    }
}
