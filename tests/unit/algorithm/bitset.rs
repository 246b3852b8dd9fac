//! Tests for `TileBitset` set operations and conversions

#[cfg(test)]
mod tests {
    use tilesynth::algorithm::bitset::TileBitset;

    // Tests a new bitset is empty with count 0
    #[test]
    fn test_new_bitset() {
        let bitset = TileBitset::new(10);
        assert_eq!(bitset.count(), 0);
        assert!(bitset.is_empty());
        assert_eq!(bitset.catalog_size(), 10);
    }

    // Tests insertion and containment checking
    #[test]
    fn test_insert_and_contains() {
        let mut bitset = TileBitset::new(10);
        bitset.insert(5);
        assert!(bitset.contains(5));
        assert!(!bitset.contains(3));
        assert_eq!(bitset.count(), 1);
        assert_eq!(bitset.only(), Some(5));
    }

    // Tests tile 0 is a regular member
    #[test]
    fn test_air_tile_is_member() {
        let bitset = TileBitset::all(3);
        assert!(bitset.contains(0));
        assert_eq!(bitset.to_vec(), vec![0, 1, 2]);
    }

    // Tests ids beyond the catalog are ignored
    #[test]
    fn test_out_of_catalog_ids_ignored() {
        let mut bitset = TileBitset::new(4);
        bitset.insert(4);
        bitset.insert(100);
        assert!(bitset.is_empty());
        assert!(!bitset.contains(4));
    }

    // Tests intersection of two bitsets returns correct elements
    #[test]
    fn test_intersection() {
        let mut set1 = TileBitset::new(10);
        set1.insert(1);
        set1.insert(3);
        set1.insert(5);

        let mut set2 = TileBitset::new(10);
        set2.insert(3);
        set2.insert(5);
        set2.insert(7);

        let intersection = set1.intersection(&set2);
        assert_eq!(intersection.to_vec(), vec![3, 5]);
        assert_eq!(set1.count(), 3);
    }

    // Tests in-place intersection reports how many tiles it removed
    #[test]
    fn test_intersect_with_counts_removed() {
        let mut domain = TileBitset::all(5);
        let mut permitted = TileBitset::new(5);
        permitted.insert(0);
        permitted.insert(4);

        assert_eq!(domain.intersect_with(&permitted), 3);
        assert_eq!(domain.to_vec(), vec![0, 4]);
        assert_eq!(domain.intersect_with(&permitted), 0);
    }

    // Tests union adds every member of the other set
    #[test]
    fn test_union_with() {
        let mut set = TileBitset::singleton(1, 6);
        set.union_with(&TileBitset::singleton(4, 6));
        assert_eq!(set.to_vec(), vec![1, 4]);
    }

    // Tests the single-member accessor
    #[test]
    fn test_only() {
        assert_eq!(TileBitset::singleton(2, 4).only(), Some(2));
        assert_eq!(TileBitset::new(4).only(), None);
        assert_eq!(TileBitset::all(4).only(), None);
    }

    // Tests ordered member lookup
    #[test]
    fn test_nth_member() {
        let mut set = TileBitset::new(8);
        set.insert(2);
        set.insert(6);
        assert_eq!(set.nth(0), Some(2));
        assert_eq!(set.nth(1), Some(6));
        assert_eq!(set.nth(2), None);
    }

    // Tests the brace-delimited display form
    #[test]
    fn test_display() {
        let mut set = TileBitset::new(4);
        assert_eq!(set.to_string(), "{}");
        set.insert(0);
        set.insert(2);
        assert_eq!(set.to_string(), "{0,2}");
    }
}
