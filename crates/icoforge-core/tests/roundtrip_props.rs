//! Property tests for ordering, offsets and round-trips

use icoforge_core::format::payload_start;
use icoforge_core::*;
use proptest::prelude::*;

/// Subset of standard sizes with a payload for each, in random order
fn icon_images() -> impl Strategy<Value = Vec<(Dimension, Vec<u8>)>> {
    proptest::collection::vec(
        (0..STANDARD_SIZES.len(), proptest::collection::vec(any::<u8>(), 0..64)),
        1..12,
    )
    .prop_map(|picks| {
        let mut seen = std::collections::BTreeSet::new();
        picks
            .into_iter()
            .filter(|(index, _)| seen.insert(*index))
            .map(|(index, payload)| (STANDARD_SIZES[index], payload))
            .collect()
    })
}

fn build(images: &[(Dimension, Vec<u8>)]) -> IconSet<MemorySource> {
    let mut icon = IconSet::new();
    for (dimension, payload) in images {
        icon.add(MemorySource::new(
            dimension.to_string(),
            *dimension,
            payload.clone(),
        ))
        .unwrap();
    }
    icon
}

proptest! {
    #[test]
    fn prop_entries_always_ascending(images in icon_images()) {
        let icon = build(&images);
        let dims: Vec<Dimension> = icon.entries_sorted().map(ImageEntry::dimension).collect();
        let mut sorted = dims.clone();
        sorted.sort();
        prop_assert_eq!(dims, sorted);
    }

    #[test]
    fn prop_offsets_chain(images in icon_images()) {
        let icon = build(&images);
        let directory = icon.layout().unwrap();

        prop_assert_eq!(directory[0].offset as usize, payload_start(directory.len()));
        for pair in directory.windows(2) {
            prop_assert_eq!(pair[0].end(), u64::from(pair[1].offset));
        }
    }

    #[test]
    fn prop_round_trip(images in icon_images()) {
        let mut icon = build(&images);
        let bytes = icon.encode().unwrap();
        let reader = IcoReader::parse(&bytes).unwrap();

        let mut expected = images.clone();
        expected.sort_by_key(|(dimension, _)| *dimension);

        prop_assert_eq!(reader.count(), expected.len());
        for (index, (dimension, payload)) in expected.iter().enumerate() {
            let entry = reader.entries()[index];
            prop_assert_eq!(entry.dimension(), *dimension);
            prop_assert_eq!(entry.length as usize, payload.len());
            prop_assert_eq!(reader.payload(index).unwrap(), payload.as_slice());
        }

        let total: usize = expected.iter().map(|(_, p)| p.len()).sum();
        prop_assert_eq!(bytes.len(), payload_start(expected.len()) + total);
    }

    #[test]
    fn prop_encode_idempotent(images in icon_images()) {
        let mut icon = build(&images);
        let first = icon.encode().unwrap();
        let second = icon.encode().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_insertion_order_irrelevant(images in icon_images()) {
        let mut forward = build(&images);
        let reversed: Vec<_> = images.iter().rev().cloned().collect();
        let mut backward = build(&reversed);
        prop_assert_eq!(forward.encode().unwrap(), backward.encode().unwrap());
    }
}
