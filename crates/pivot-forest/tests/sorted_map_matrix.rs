//! Sorted map behaviour on the plain (unbalanced) policy.

use pivot_forest::{BstMap, SortedMap, TreeError};

fn next_pseudo(seed: &mut u64) -> i32 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    ((*seed >> 33) % 101) as i32
}

// ---------------------------------------------------------------------------
// put / get / remove sweeps
// ---------------------------------------------------------------------------

#[test]
fn numbers_from_0_to_100() {
    let mut map = BstMap::<i32, i32>::new();
    for i in 0..=100 {
        assert_eq!(map.put(i, i).unwrap(), None);
        assert_eq!(map.size(), (i + 1) as usize);
    }
    for i in 0..=100 {
        assert_eq!(map.remove(&i).unwrap(), Some(i));
        assert_eq!(map.size(), (100 - i) as usize);
    }
    assert!(map.is_empty());
}

#[test]
fn numbers_both_directions_from_50() {
    let mut map = BstMap::<i32, i32>::new();
    for i in 1..=100 {
        map.put(50 + i, 50 + i).unwrap();
        map.put(50 - i, 50 - i).unwrap();
        assert_eq!(map.size(), ((i - 1) * 2 + 2) as usize);
    }
    for i in 1..=100 {
        map.remove(&(50 - i)).unwrap();
        map.remove(&(50 + i)).unwrap();
    }
    assert_eq!(map.size(), 0);
}

#[test]
fn random_numbers_round_trip_in_order() {
    let mut map = BstMap::<i32, i32>::new();
    let mut seed = 0x5EED_u64;
    let mut inserted = Vec::new();
    for _ in 0..=500 {
        let num = next_pseudo(&mut seed);
        if map.put(num, num * 3).unwrap().is_none() {
            inserted.push(num);
        }
        assert_eq!(map.check_invariants(), Ok(()));
    }
    inserted.sort_unstable();
    let keys: Vec<i32> = map.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, inserted);
}

#[test]
fn overwrite_returns_the_previous_value() {
    let mut map = BstMap::new();
    assert_eq!(map.put(5, 1).unwrap(), None);
    assert_eq!(map.put(5, 2).unwrap(), Some(1));
    assert_eq!(map.size(), 1);
    assert_eq!(map.get(&5).unwrap(), Some(&2));
}

#[test]
fn removing_an_absent_key_changes_nothing() {
    let mut map = BstMap::new();
    for k in [20, 10, 30, 25] {
        map.put(k, k).unwrap();
    }
    let before: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(map.remove(&99).unwrap(), None);
    let after: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(before, after);
    assert_eq!(map.size(), 4);
    assert_eq!(map.check_invariants(), Ok(()));
}

#[test]
fn empty_map_behaviour() {
    let mut map = BstMap::<i32, i32>::new();
    assert!(map.is_empty());
    assert_eq!(map.get(&1).unwrap(), None);
    assert_eq!(map.remove(&1).unwrap(), None);
    assert_eq!(map.first_entry(), None);
    assert_eq!(map.last_entry(), None);
    assert_eq!(map.iter().count(), 0);
    assert_eq!(map.check_invariants(), Ok(()));
}

// ---------------------------------------------------------------------------
// neighbour queries
// ---------------------------------------------------------------------------

fn tens_map() -> BstMap<i32, i32> {
    let mut map = BstMap::new();
    for k in [20, 10, 40, 30] {
        map.put(k, k).unwrap();
    }
    map
}

fn key(entry: Option<(&i32, &i32)>) -> Option<i32> {
    entry.map(|(k, _)| *k)
}

#[test]
fn first_and_last_entries() {
    let map = tens_map();
    assert_eq!(key(map.first_entry()), Some(10));
    assert_eq!(key(map.last_entry()), Some(40));
}

#[test]
fn ceiling_and_floor_on_present_and_absent_keys() {
    let map = tens_map();
    assert_eq!(key(map.ceiling_entry(&20).unwrap()), Some(20));
    assert_eq!(key(map.floor_entry(&20).unwrap()), Some(20));
    assert_eq!(key(map.ceiling_entry(&15).unwrap()), Some(20));
    assert_eq!(key(map.floor_entry(&15).unwrap()), Some(10));
    assert_eq!(key(map.ceiling_entry(&5).unwrap()), Some(10));
    assert_eq!(key(map.floor_entry(&5).unwrap()), None);
    assert_eq!(key(map.ceiling_entry(&45).unwrap()), None);
    assert_eq!(key(map.floor_entry(&45).unwrap()), Some(40));
}

#[test]
fn lower_and_higher_step_past_exact_matches() {
    let map = tens_map();
    assert_eq!(key(map.lower_entry(&20).unwrap()), Some(10));
    assert_eq!(key(map.higher_entry(&20).unwrap()), Some(30));
    assert_eq!(key(map.lower_entry(&10).unwrap()), None);
    assert_eq!(key(map.higher_entry(&40).unwrap()), None);
    assert_eq!(key(map.lower_entry(&15).unwrap()), Some(10));
    assert_eq!(key(map.higher_entry(&15).unwrap()), Some(20));
}

// ---------------------------------------------------------------------------
// sub_map
// ---------------------------------------------------------------------------

#[test]
fn sub_map_is_half_open() {
    let mut map = BstMap::new();
    for k in [6, 3, 8, 1, 4, 7, 9, 0, 2, 5] {
        map.put(k, k).unwrap();
    }
    let keys: Vec<i32> = map.sub_map(&3, &7).unwrap().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![3, 4, 5, 6]);
}

#[test]
fn sub_map_with_absent_bounds() {
    let map = tens_map();
    let keys: Vec<i32> = map.sub_map(&15, &40).unwrap().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![20, 30]);
}

#[test]
fn sub_map_with_inverted_or_empty_range() {
    let map = tens_map();
    assert_eq!(map.sub_map(&30, &30).unwrap().count(), 0);
    assert_eq!(map.sub_map(&40, &10).unwrap().count(), 0);
}

// ---------------------------------------------------------------------------
// position handles
// ---------------------------------------------------------------------------

#[test]
fn handles_to_spliced_nodes_become_defunct() {
    let mut map = BstMap::new();
    for k in [20, 10, 30] {
        map.put(k, k).unwrap();
    }
    let h = map.search(&10).unwrap();
    assert_eq!(map.entry(h).unwrap().map(|(k, _)| *k), Some(10));

    map.remove(&10).unwrap();
    assert_eq!(map.validate(h), Err(TreeError::InvalidPosition));
    assert_eq!(map.entry(h), Err(TreeError::InvalidPosition));
}

#[test]
fn handle_survives_a_successor_copy() {
    let mut map = BstMap::new();
    for k in [20, 10, 30] {
        map.put(k, k).unwrap();
    }
    // 20 has two internal children, so its successor 30 is the node that is
    // physically spliced; the handle keeps pointing at a live node that now
    // holds the successor's entry.
    let h = map.search(&20).unwrap();
    map.remove(&20).unwrap();
    assert_eq!(map.validate(h), Ok(()));
    assert_eq!(map.entry(h).unwrap().map(|(k, _)| *k), Some(30));
}

#[test]
fn search_lands_on_the_insertion_sentinel() {
    let mut map = BstMap::new();
    map.put(10, 10).unwrap();
    let miss = map.search(&20).unwrap();
    assert_eq!(map.entry(miss).unwrap(), None);
    // inserting the missed key fills exactly that sentinel
    map.put(20, 20).unwrap();
    assert_eq!(map.entry(miss).unwrap().map(|(k, _)| *k), Some(20));
}

// ---------------------------------------------------------------------------
// ordering contract
// ---------------------------------------------------------------------------

#[test]
fn incomparable_keys_are_rejected_before_mutation() {
    let mut map = BstMap::new();
    map.put(1.0f64, 1).unwrap();
    assert_eq!(map.put(f64::NAN, 2), Err(TreeError::IncompatibleKey));
    assert_eq!(map.get(&f64::NAN), Err(TreeError::IncompatibleKey));
    assert_eq!(map.size(), 1);
    assert_eq!(map.check_invariants(), Ok(()));
}

#[test]
fn injected_comparator_fixes_the_order() {
    let mut map = SortedMap::with_comparator(|a: &i32, b: &i32| b.partial_cmp(a));
    for k in [2, 4, 1, 3] {
        map.put(k, k).unwrap();
    }
    let keys: Vec<i32> = map.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![4, 3, 2, 1]);
    assert_eq!(key(map.first_entry()), Some(4));
    assert_eq!(key(map.last_entry()), Some(1));
    assert_eq!(map.check_invariants(), Ok(()));
}
