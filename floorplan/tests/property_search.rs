use floorplan::algorithms::search::{matches_query, name_cmp, room_id, step_index};
use proptest::prelude::*;
use std::cmp::Ordering;

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn room_ids_are_stable_slugs(name in "[a-zA-Z0-9 _.áàâãéêíóôõúçÁÀÂÃÉÊÍÓÔÕÚÇ-]{0,40}") {
        let id = room_id(&name);
        prop_assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!id.starts_with('-') && !id.ends_with('-'));
        prop_assert!(!id.contains("--"));
        prop_assert_eq!(room_id(&id), id.clone());
        prop_assert_eq!(room_id(&name.to_uppercase()), room_id(&name.to_lowercase()));
    }

    #[test]
    fn stepping_wraps_and_round_trips(len in 1usize..50, start in 0usize..50, dir in prop_oneof![Just(1), Just(-1)]) {
        let start = start % len;
        let next = step_index(Some(start), len, dir).unwrap();
        prop_assert!(next < len);
        prop_assert_eq!(step_index(Some(next), len, -dir), Some(start));

        let mut i = start;
        for _ in 0..len {
            i = step_index(Some(i), len, dir).unwrap();
        }
        prop_assert_eq!(i, start);
    }

    #[test]
    fn stepping_from_nothing_starts_at_an_end(len in 1usize..50) {
        prop_assert_eq!(step_index(None, len, 1), Some(0));
        prop_assert_eq!(step_index(None, len, -1), Some(len - 1));
    }

    #[test]
    fn name_order_is_total(a in "[a-zA-ZÀ-ÿ ]{0,12}", b in "[a-zA-ZÀ-ÿ ]{0,12}") {
        let ab = name_cmp(&a, &b);
        prop_assert_eq!(ab.reverse(), name_cmp(&b, &a));
        prop_assert_eq!(ab == Ordering::Equal, a == b);
    }

    #[test]
    fn padded_queries_match_like_trimmed_ones(name in "[A-Z]{1,12}", q in "[a-z]{0,4}") {
        let padded = format!("  {q}\t");
        prop_assert_eq!(matches_query(&name, &padded), matches_query(&name, &q));
    }
}

#[test]
fn empty_lists_have_no_step() {
    assert_eq!(step_index(None, 0, 1), None);
    assert_eq!(step_index(Some(3), 0, -1), None);
}
