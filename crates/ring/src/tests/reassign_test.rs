#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::{
        KeyNodeWatcher, Keys, RingConfig, RingError,
        tests::helpers::{
            insert_slice, remove_slice, ring, ring_with, seed_hashes, slices_by_hash,
        },
    };

    fn reassign(ring: &crate::Ring<&'static str>, slice: u64, start: usize, end: usize, circle: bool) {
        let mut state = ring.state.write();
        ring.reassign_range(&mut state, slice, start, end, circle);
    }

    #[test]
    fn reassign_range_walks_circularly() {
        let ring = ring();
        seed_hashes(&ring, &[(1, 1), (2, 1), (3, 3), (4, 3), (7, 3), (9, 3)]);

        reassign(&ring, 5, 4, 0, false);
        assert_eq!(
            slices_by_hash(&ring),
            HashMap::from([(1, 1), (2, 1), (3, 3), (4, 3), (7, 5), (9, 5)])
        );

        reassign(&ring, 2, 1, 2, false);
        assert_eq!(
            slices_by_hash(&ring),
            HashMap::from([(1, 1), (2, 2), (3, 3), (4, 3), (7, 5), (9, 5)])
        );

        reassign(&ring, 8, 5, 0, false);
        assert_eq!(
            slices_by_hash(&ring),
            HashMap::from([(1, 1), (2, 2), (3, 3), (4, 3), (7, 5), (9, 8)])
        );

        reassign(&ring, 5, 5, 0, false);
        assert_eq!(
            slices_by_hash(&ring),
            HashMap::from([(1, 1), (2, 2), (3, 3), (4, 3), (7, 5), (9, 5)])
        );
    }

    #[test]
    fn reassign_range_on_empty_index_is_noop() {
        let ring = ring();

        reassign(&ring, 0, 0, 0, false);

        assert!(slices_by_hash(&ring).is_empty());
    }

    #[test]
    fn equal_bounds_without_wraparound_reassign_nothing() {
        let ring = ring();
        seed_hashes(&ring, &[(1, 0)]);

        reassign(&ring, 2, 0, 0, false);

        assert_eq!(slices_by_hash(&ring), HashMap::from([(1, 0)]));
    }

    #[test]
    fn equal_bounds_with_wraparound_reassign_everything() {
        let ring = ring();
        seed_hashes(&ring, &[(0, 1)]);

        reassign(&ring, 2, 0, 0, true);

        assert_eq!(slices_by_hash(&ring), HashMap::from([(0, 2)]));
    }

    #[test]
    fn reassign_range_wraps_past_the_end() {
        let ring = ring();
        seed_hashes(&ring, &[(1, 2), (2, 2), (5, 2), (6, 2)]);

        reassign(&ring, 3, 2, 1, false);
        assert_eq!(
            slices_by_hash(&ring),
            HashMap::from([(1, 3), (2, 2), (5, 3), (6, 3)])
        );

        reassign(&ring, 3, 2, 2, true);
        assert_eq!(
            slices_by_hash(&ring),
            HashMap::from([(1, 3), (2, 3), (5, 3), (6, 3)])
        );
    }

    #[test]
    fn inserted_slice_takes_only_its_own_range() {
        // (existing slice, new slice, expected owner of every hash)
        let cases = [(6, 5, 6), (5, 6, 6), (1, 6, 1), (1, 0, 1), (0, 1, 1), (6, 1, 1)];

        for (existing, inserted, expected) in cases {
            let ring = ring();
            insert_slice(&ring, existing, "A").expect("first slice");
            seed_hashes(
                &ring,
                &[(1, existing), (2, existing), (3, existing), (4, existing)],
            );

            insert_slice(&ring, inserted, "A").expect("second slice");

            assert_eq!(
                slices_by_hash(&ring),
                HashMap::from([(1, expected), (2, expected), (3, expected), (4, expected)]),
                "existing {existing}, inserted {inserted}"
            );
        }
    }

    #[test]
    fn slices_without_hashes_are_indexed_with_owners() {
        let ring = ring();

        insert_slice(&ring, 1, "A").expect("slice");
        insert_slice(&ring, 2, "A").expect("slice");
        insert_slice(&ring, 3, "A").expect("slice");
        insert_slice(&ring, 4, "B").expect("slice");

        let state = ring.state.read();
        assert_eq!(state.slices.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(
            state.nodes_by_slice,
            HashMap::from([
                (1, "A".to_string()),
                (2, "A".to_string()),
                (3, "A".to_string()),
                (4, "B".to_string()),
            ])
        );
    }

    #[test]
    fn inserting_an_existing_slice_fails() {
        let ring = ring();

        insert_slice(&ring, 0, "A").expect("slice");

        assert_eq!(
            insert_slice(&ring, 0, "A"),
            Err(RingError::SliceAlreadyExists(0))
        );
    }

    #[test]
    fn slice_insertions_and_removals_move_only_affected_hashes() {
        const H1: u64 = 14180219187711517570;
        const H2: u64 = 14420089009441877859;
        const H3: u64 = 17062952057979069182;

        let ring = ring_with(RingConfig::default());

        insert_slice(&ring, 1, "A").expect("slice");
        for name in ["1", "2", "3"] {
            ring.emplace(crate::Key::new(name, "v"), None).expect("emplace");
        }

        assert_eq!(ring.state.read().hashes.as_slice(), &[H1, H2, H3]);
        assert_eq!(slices_by_hash(&ring), HashMap::from([(H1, 1), (H2, 1), (H3, 1)]));

        insert_slice(&ring, H3 - 1, "B").expect("slice");
        assert_eq!(
            slices_by_hash(&ring),
            HashMap::from([(H1, 1), (H2, 1), (H3, H3 - 1)])
        );

        insert_slice(&ring, 0, "B").expect("slice");
        assert_eq!(
            slices_by_hash(&ring),
            HashMap::from([(H1, 1), (H2, 1), (H3, H3 - 1)])
        );

        remove_slice(&ring, H3 - 1);
        assert_eq!(slices_by_hash(&ring), HashMap::from([(H1, 1), (H2, 1), (H3, 1)]));

        // Removing an absent slice is a no-op.
        remove_slice(&ring, H3 - 1);

        insert_slice(&ring, H2 - 1, "B").expect("slice");
        assert_eq!(
            slices_by_hash(&ring),
            HashMap::from([(H1, 1), (H2, H2 - 1), (H3, H2 - 1)])
        );

        remove_slice(&ring, H2 - 1);
        assert_eq!(slices_by_hash(&ring), HashMap::from([(H1, 1), (H2, 1), (H3, 1)]));

        remove_slice(&ring, 1);
        assert_eq!(slices_by_hash(&ring), HashMap::from([(H1, 0), (H2, 0), (H3, 0)]));

        insert_slice(&ring, 1, "B").expect("slice");
        assert_eq!(slices_by_hash(&ring), HashMap::from([(H1, 1), (H2, 1), (H3, 1)]));

        // A slice exactly on a hash owns that hash.
        insert_slice(&ring, H2, "C").expect("slice");
        assert_eq!(slices_by_hash(&ring), HashMap::from([(H1, 1), (H2, H2), (H3, H2)]));

        insert_slice(&ring, H3 - 2, "C").expect("slice");
        assert_eq!(
            slices_by_hash(&ring),
            HashMap::from([(H1, 1), (H2, H2), (H3, H3 - 2)])
        );

        ring.remove("1");
        ring.remove("1");

        assert_eq!(slices_by_hash(&ring), HashMap::from([(H2, H2), (H3, H3 - 2)]));
        assert_eq!(ring.state().hashes_by_key.len(), 2);
    }

    #[test]
    fn emplace_on_a_slice_position_is_owned_by_that_slice() {
        const H2: u64 = 14420089009441877859;

        let ring = ring();
        insert_slice(&ring, 1, "A").expect("slice");
        insert_slice(&ring, H2, "B").expect("slice");

        ring.emplace(crate::Key::new("2", "v"), None).expect("emplace");

        assert_eq!(ring.node_for_key("2"), Ok(Some("B".to_string())));
        assert_eq!(slices_by_hash(&ring), HashMap::from([(H2, H2)]));
    }
}
