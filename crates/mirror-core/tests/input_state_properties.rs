//! Integration tests for the mirror-core public API.
//!
//! These exercise the key table, tracker, viewport and frame types together,
//! the way the viewer's translator and capture pipeline use them.

use mirror_core::{
    layout_for_depth, ByteOrder, ChannelLayout, Drawable, FrameSnapshot, KeyMapper,
    KeyStateTracker, LocalKey, ViewportGeometry,
};
use serde::{Deserialize, Serialize};

#[test]
fn test_unobserved_key_reads_as_released() {
    let tracker = KeyStateTracker::new();

    assert!(!tracker.get(LocalKey::KeyA));
    assert!(tracker.is_empty());
}

#[test]
fn test_repeated_set_keeps_one_entry_per_key() {
    // Arrange
    let mut tracker = KeyStateTracker::new();

    // Act
    tracker.set(LocalKey::Enter, true);
    tracker.set(LocalKey::Enter, true);
    tracker.set(LocalKey::Enter, false);
    tracker.set(LocalKey::KeyZ, true);

    // Assert
    assert_eq!(tracker.len(), 2);
    assert!(!tracker.get(LocalKey::Enter));
    assert_eq!(tracker.held_keys(), vec![LocalKey::KeyZ]);
}

#[test]
fn test_keys_outside_the_table_have_no_keysym() {
    for key in [LocalKey::F1, LocalKey::CapsLock, LocalKey::ArrowUp, LocalKey::Other(0x1234)] {
        assert_eq!(KeyMapper::translate(key), None, "{key} must be unmapped");
    }
}

#[test]
fn test_every_mapped_key_has_a_distinct_keysym() {
    let mut keysyms: Vec<u32> = LocalKey::named()
        .filter_map(KeyMapper::translate)
        .map(|sym| sym.0)
        .collect();
    let total = keysyms.len();
    keysyms.sort_unstable();
    keysyms.dedup();

    assert_eq!(total, 48);
    assert_eq!(keysyms.len(), total);
}

#[test]
fn test_viewport_after_resize_maps_window_centre_to_screen_centre() {
    let mut geometry = ViewportGeometry::new(1920, 1080);
    geometry.resize(200, 100);

    assert_eq!(geometry.map(100, 50), Ok((960, 540)));
}

#[test]
fn test_every_depth_yields_a_drawable() {
    for depth in [8u32, 16, 24, 32] {
        let bytes = (depth as usize).div_ceil(8);
        let frame = FrameSnapshot {
            buffer: vec![0u8; 4 * 4 * bytes],
            width: 4,
            height: 4,
            bits_per_pixel: depth,
            stride: 4 * bytes,
            byte_order: ByteOrder::LsbFirst,
        };

        let drawable = Drawable::wrap(&frame);

        assert!(drawable.is_ok(), "depth {depth} must wrap");
    }
    assert_eq!(layout_for_depth(8), ChannelLayout::ARGB32);
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Bindings {
    exit: LocalKey,
}

#[test]
fn test_local_key_serializes_by_name_in_toml() {
    let text = toml::to_string(&Bindings {
        exit: LocalKey::Escape,
    })
    .unwrap();
    assert_eq!(text.trim(), r#"exit = "Escape""#);

    let parsed: Bindings = toml::from_str(r#"exit = "q""#).unwrap();
    assert_eq!(parsed.exit, LocalKey::KeyQ);
}

#[test]
fn test_unknown_key_name_fails_to_deserialize() {
    let result: Result<Bindings, _> = toml::from_str(r#"exit = "Hyper""#);
    assert!(result.is_err());
}
