//! Tests for rule derivation from samples and the closed-world default

#[cfg(test)]
mod tests {
    use tilesynth::AlgorithmError;
    use tilesynth::algorithm::bitset::TileBitset;
    use tilesynth::algorithm::rules::{RuleTable, RuleTableBuilder};
    use tilesynth::spatial::{Dimensions, Direction, TileLayout, Topology};

    fn permitted(rules: &RuleTable, tile: usize, direction: Direction) -> Vec<usize> {
        rules
            .permitted(tile, direction)
            .map(|set| set.to_vec())
            .unwrap_or_default()
    }

    fn air_cube_with(center: i32) -> TileLayout {
        let mut sample = TileLayout::filled(Dimensions::new(3, 3, 3), Topology::Volumetric, 0)
            .expect("valid sample dimensions");
        sample.set([1, 1, 1], center).expect("center in bounds");
        sample
    }

    // Tests every entry is non-empty after the closed-world default
    #[test]
    fn test_all_entries_non_empty() {
        let sample = TileLayout::builtin_sample().expect("built-in sample");
        let rules = RuleTable::from_sample(&sample, 6).expect("rules");

        assert_eq!(rules.entries().count(), 6 * 6);
        for (tile, direction, set) in rules.entries() {
            assert!(!set.is_empty(), "tile {tile} {direction} has no rule");
        }
    }

    // Tests a tile surrounded by air only permits air around it
    #[test]
    fn test_isolated_tile_permits_air() {
        let rules = RuleTable::from_sample(&air_cube_with(1), 2).expect("rules");

        for &direction in Topology::Volumetric.directions() {
            assert_eq!(permitted(&rules, 1, direction), vec![0]);
        }
        for &direction in Topology::Volumetric.directions() {
            assert_eq!(permitted(&rules, 0, direction), vec![0, 1]);
        }
    }

    // Tests vertical adjacency is recorded in both directions
    #[test]
    fn test_stacked_tiles() {
        let mut sample = TileLayout::filled(Dimensions::new(1, 2, 1), Topology::Volumetric, 1)
            .expect("valid sample dimensions");
        sample.set([0, 1, 0], 2).expect("in bounds");

        let rules = RuleTable::from_sample(&sample, 3).expect("rules");
        assert!(permitted(&rules, 1, Direction::PositiveY).contains(&2));
        assert!(permitted(&rules, 2, Direction::NegativeY).contains(&1));
        assert_eq!(permitted(&rules, 1, Direction::NegativeY), vec![0]);
        assert_eq!(permitted(&rules, 2, Direction::PositiveY), vec![0]);
    }

    // Tests the built-in column: base under shaft, cap on top
    #[test]
    fn test_builtin_column_rules() {
        let sample = TileLayout::builtin_sample().expect("built-in sample");
        let rules = RuleTable::from_sample(&sample, 4).expect("rules");

        assert_eq!(permitted(&rules, 3, Direction::PositiveY), vec![2]);
        assert_eq!(permitted(&rules, 2, Direction::PositiveY), vec![1, 2]);
        assert_eq!(permitted(&rules, 2, Direction::NegativeY), vec![2, 3]);
        assert_eq!(permitted(&rules, 1, Direction::NegativeY), vec![2]);
        assert_eq!(permitted(&rules, 2, Direction::PositiveX), vec![0]);
        assert_eq!(permitted(&rules, 0, Direction::PositiveX), vec![0, 1, 2, 3]);
        assert_eq!(permitted(&rules, 0, Direction::NegativeY), vec![0]);
    }

    // Tests undetermined sample cells neither seed nor receive rules
    #[test]
    fn test_undetermined_cells_ignored() {
        let sample = TileLayout::planar_from_rows(&[vec![-1, 1], vec![2, -1]])
            .expect("valid rows");
        let rules = RuleTable::from_sample(&sample, 3).expect("rules");

        for (_, _, set) in rules.entries() {
            assert_eq!(set.to_vec(), vec![0]);
        }
    }

    // Tests sample tiles outside the catalog are rejected
    #[test]
    fn test_sample_tile_outside_catalog() {
        let result = RuleTable::from_sample(&air_cube_with(5), 4);
        assert!(matches!(
            result,
            Err(AlgorithmError::InvalidTileIndex {
                index: 5,
                max_tiles: 4
            })
        ));
    }

    // Tests the builder rejects directions outside its topology
    #[test]
    fn test_builder_rejects_foreign_direction() {
        let mut builder = RuleTableBuilder::new(2, Topology::Planar);
        assert!(builder.allow(0, Direction::PositiveZ, 1).is_err());
        assert!(builder.allow(2, Direction::PositiveX, 0).is_err());
        assert!(builder.allow(0, Direction::PositiveX, 2).is_err());
        assert!(builder.allow(0, Direction::PositiveX, 1).is_ok());
    }

    // Tests the builder rejects samples of another topology
    #[test]
    fn test_builder_rejects_foreign_sample() {
        let mut builder = RuleTableBuilder::new(4, Topology::Planar);
        let sample = TileLayout::builtin_sample().expect("built-in sample");
        assert!(matches!(
            builder.observe(&sample),
            Err(AlgorithmError::InvalidSourceData { .. })
        ));
    }

    // Tests explicit rules survive build while empty ones fall back to air
    #[test]
    fn test_builder_closed_world_default() {
        let mut builder = RuleTableBuilder::new(3, Topology::Planar);
        builder
            .allow(2, Direction::PositiveX, 1)
            .expect("valid rule");
        let rules = builder.build();

        assert_eq!(permitted(&rules, 2, Direction::PositiveX), vec![1]);
        assert_eq!(permitted(&rules, 2, Direction::NegativeX), vec![0]);
        assert!(rules.permitted(2, Direction::PositiveZ).is_none());
    }

    // Tests the union of rules over a domain
    #[test]
    fn test_permitted_for_domain() {
        let mut builder = RuleTableBuilder::new(4, Topology::Planar);
        builder.allow(1, Direction::PositiveY, 2).expect("valid rule");
        builder.allow(3, Direction::PositiveY, 3).expect("valid rule");
        let rules = builder.build();

        let mut domain = TileBitset::new(4);
        domain.insert(1);
        domain.insert(3);
        let union = rules.permitted_for(&domain, Direction::PositiveY);
        assert_eq!(union.to_vec(), vec![2, 3]);
    }

    // Tests the rule dump lists every tile and direction
    #[test]
    fn test_rule_dump() {
        let sample = TileLayout::planar_from_rows(&[vec![0], vec![1]]).expect("valid rows");
        let rules = RuleTable::from_sample(&sample, 2).expect("rules");

        assert_eq!(
            rules.to_string(),
            "Tile 0: { +y: (0), -y: (1), +x: (0), -x: (0) }\n\
             Tile 1: { +y: (0), -y: (0), +x: (0), -x: (0) }\n"
        );
    }
}
