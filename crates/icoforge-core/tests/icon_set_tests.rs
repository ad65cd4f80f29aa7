//! Icon set behavior through the public API
//!
//! Covers admission, ordering, encoding scenarios and release discipline.

use icoforge_core::*;
use icoforge_test_utils::{memory_image, release_counter, releases, TrackedSource};
use pretty_assertions::assert_eq;

#[test]
fn test_two_image_icon_layout() {
    let mut icon = IconSet::new();
    icon.add(memory_image(32, 200)).unwrap();
    icon.add(memory_image(16, 100)).unwrap();

    let bytes = icon.encode().unwrap();
    let reader = IcoReader::parse(&bytes).unwrap();

    assert_eq!(reader.header().count, 2);
    assert_eq!(reader.entries()[0].offset, 38);
    assert_eq!(reader.entries()[1].offset, 138);
    assert_eq!(bytes.len(), 6 + 32 + 100 + 200);
}

#[test]
fn test_duplicate_leaves_first_entry() {
    let mut icon = IconSet::new();
    icon.add(memory_image(48, 10)).unwrap();

    let err = icon
        .add(MemorySource::new("late.png", Dimension::square(48), vec![0; 99]))
        .unwrap_err();
    assert!(matches!(err, IcoError::DuplicateSize { .. }));

    let entry = icon.get(Dimension::square(48)).unwrap();
    assert_eq!(entry.source_identifier(), "memory_48x48");
    assert_eq!(entry.byte_length(), 10);
}

#[test]
fn test_every_non_standard_square_is_rejected() {
    let mut icon: IconSet<MemorySource> = IconSet::new();
    for edge in (1..=300).filter(|e| !Dimension::square(*e).is_standard()) {
        let result = icon.add(memory_image(edge, 1));
        assert!(
            matches!(result, Err(IcoError::InvalidSize { .. })),
            "{edge}x{edge} should be rejected"
        );
    }
    assert!(icon.is_empty());
}

#[test]
fn test_missing_sizes_scenario() {
    let mut icon = IconSet::new();
    icon.add(memory_image(16, 1)).unwrap();

    let expected: Vec<Dimension> = STANDARD_SIZES
        .into_iter()
        .filter(|d| *d != Dimension::square(16))
        .collect();
    assert_eq!(icon.missing_sizes().into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn test_full_standard_icon() {
    let mut icon = IconSet::new();
    for size in STANDARD_SIZES.iter().rev() {
        icon.add(memory_image(size.width, size.width as usize)).unwrap();
    }
    assert!(icon.missing_sizes().is_empty());

    let bytes = icon.finish().unwrap();
    let reader = IcoReader::parse(&bytes).unwrap();
    assert_eq!(
        reader.dimensions().collect::<Vec<_>>(),
        STANDARD_SIZES.to_vec()
    );
    // 256x256 is written as 0x0
    assert_eq!(reader.entries()[9].width, 0);
    assert_eq!(reader.entries()[9].height, 0);
}

#[test]
fn test_remove_by_source_releases_once() {
    let counter = release_counter();
    let mut icon = IconSet::new();
    icon.add(TrackedSource::named("a.png", 16, &counter)).unwrap();
    icon.add(TrackedSource::named("b.png", 32, &counter)).unwrap();

    assert!(icon.remove_by_source("a.png"));
    assert_eq!(releases(&counter), 1);

    assert!(!icon.remove_by_source("a.png"));
    assert_eq!(releases(&counter), 1);

    assert_eq!(icon.close(), 1);
    assert_eq!(releases(&counter), 2);
}

#[test]
fn test_remove_by_size_releases_once() {
    let counter = release_counter();
    let mut icon = IconSet::new();
    icon.add(TrackedSource::new(64, 4, &counter)).unwrap();

    assert!(icon.remove_by_size(Dimension::square(64)));
    assert!(!icon.remove_by_size(Dimension::square(64)));
    drop(icon);
    assert_eq!(releases(&counter), 1);
}

#[test]
fn test_rejected_sources_are_released() {
    let counter = release_counter();
    let mut icon = IconSet::new();
    icon.add(TrackedSource::new(16, 4, &counter)).unwrap();

    assert!(icon.add(TrackedSource::new(16, 4, &counter)).is_err());
    assert!(icon.add(TrackedSource::new(17, 4, &counter)).is_err());
    assert_eq!(releases(&counter), 2);

    icon.close();
    assert_eq!(releases(&counter), 3);
}

#[test]
fn test_finish_releases_every_source() {
    let counter = release_counter();
    let mut icon = IconSet::new();
    for edge in [16, 24, 32] {
        icon.add(TrackedSource::new(edge, 8, &counter)).unwrap();
    }

    let bytes = icon.finish().unwrap();
    assert_eq!(bytes.len(), 6 + 3 * 16 + 3 * 8);
    assert_eq!(releases(&counter), 3);
}

#[test]
fn test_drop_without_close_releases() {
    let counter = release_counter();
    {
        let mut icon = IconSet::new();
        icon.add(TrackedSource::new(16, 1, &counter)).unwrap();
        icon.add(TrackedSource::new(20, 1, &counter)).unwrap();
    }
    assert_eq!(releases(&counter), 2);
}

#[test]
fn test_encode_keeps_sources_open() {
    let counter = release_counter();
    let mut icon = IconSet::new();
    icon.add(TrackedSource::new(40, 3, &counter)).unwrap();

    let first = icon.encode().unwrap();
    let second = icon.encode().unwrap();
    assert_eq!(first, second);
    assert_eq!(releases(&counter), 0);

    icon.close();
    assert_eq!(releases(&counter), 1);
}

#[test]
fn test_verbose_config_does_not_change_output() {
    let mut quiet = IconSet::new();
    let mut loud = IconSet::with_config(IconSetConfig::new().with_verbose(true));
    for icon in [&mut quiet, &mut loud] {
        icon.add(memory_image(16, 5)).unwrap();
        icon.add(memory_image(96, 6)).unwrap();
    }
    assert_eq!(quiet.encode().unwrap(), loud.encode().unwrap());
}
