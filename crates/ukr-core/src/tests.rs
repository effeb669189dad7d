//! Unit tests for ukr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{NodeId, TargetId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(TargetId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Coord;

    #[test]
    fn euclidean_distance() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_2(b), 25.0);
    }

    #[test]
    fn non_finite_detected() {
        assert!(Coord::new(1.0, 2.0).is_finite());
        assert!(!Coord::new(f64::NAN, 2.0).is_finite());
        assert!(!Coord::new(1.0, f64::INFINITY).is_finite());
    }
}

#[cfg(test)]
mod weights {
    use crate::weights::{floor_length, pedestrian_minutes, vehicle_minutes, LENGTH_FLOOR_M};
    use crate::WeightColumn;

    #[test]
    fn vehicle_formula_matches_table() {
        let length = 1234.5;
        assert_eq!(vehicle_minutes(length), length / 1000.0 / 25.0 * 1.609344 * 60.0);
    }

    #[test]
    fn pedestrian_is_five_kmh() {
        // 5 km at 5 km/h → 60 minutes
        assert!((pedestrian_minutes(5_000.0) - 60.0).abs() < 1e-12);
    }

    #[test]
    fn floor_only_applies_to_zero() {
        assert_eq!(floor_length(0.0), LENGTH_FLOOR_M);
        assert_eq!(floor_length(3.5), 3.5);
    }

    #[test]
    fn column_names_parse_back() {
        for col in WeightColumn::ALL {
            assert_eq!(col.name().parse::<WeightColumn>().unwrap(), col);
        }
        assert_eq!("distance".parse::<WeightColumn>().unwrap(), WeightColumn::Length);
        assert!("speed".parse::<WeightColumn>().is_err());
    }

    #[test]
    fn slots_are_dense() {
        let slots: Vec<usize> = WeightColumn::ALL.iter().map(|c| c.slot()).collect();
        assert_eq!(slots, [0, 1, 2]);
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, RoutingConfig, Strategy};

    #[test]
    fn default_is_valid() {
        RoutingConfig::default().validate().unwrap();
    }

    #[test]
    fn min_buffer_above_max_rejected() {
        let cfg = RoutingConfig { min_buffer: 10_000.0, max_buffer: 5_000.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn equal_buffers_allowed() {
        let cfg = RoutingConfig { min_buffer: 5_000.0, max_buffer: 5_000.0, ..Default::default() };
        cfg.validate().unwrap();
    }

    #[test]
    fn zero_k_rejected() {
        let cfg = RoutingConfig { k: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_cutoff_rejected() {
        let cfg = RoutingConfig { cutoff: Some(-1.0), ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = RoutingConfig { cutoff: Some(f64::NAN), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn strategy_parse() {
        assert_eq!("per-source".parse::<Strategy>().unwrap(), Strategy::PerSource);
        assert_eq!("multi-source-batch".parse::<Strategy>().unwrap(), Strategy::MultiSourceBatch);
        assert!("all-pairs".parse::<Strategy>().is_err());
        assert_eq!(Strategy::MultiSourceBatch.to_string(), "multi-source-batch");
    }
}

#[cfg(all(test, feature = "serde"))]
mod config_json {
    use crate::{RoutingConfig, Strategy, WeightColumn};

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: RoutingConfig = serde_json::from_str(
            r#"{ "weights": "pedestrian_time", "strategy": "multi-source-batch", "cutoff": 60.0 }"#,
        )
        .unwrap();
        assert_eq!(cfg.weights, WeightColumn::PedestrianTime);
        assert_eq!(cfg.strategy, Strategy::MultiSourceBatch);
        assert_eq!(cfg.cutoff, Some(60.0));
        assert_eq!(cfg.k, 1);
        assert_eq!(cfg.min_buffer, 5_000.0);
    }
}

#[cfg(test)]
mod record {
    use crate::record::keep_minimum;
    use crate::{DistanceRecord, NodeId};

    #[test]
    fn keeps_minimum_per_vertex_sorted() {
        let recs = vec![
            DistanceRecord::new(NodeId(2), 7.0),
            DistanceRecord::new(NodeId(1), 3.0),
            DistanceRecord::new(NodeId(2), 4.5),
            DistanceRecord::new(NodeId(1), 9.0),
            DistanceRecord::new(NodeId(3), 4.5),
        ];
        let reduced = keep_minimum(recs);
        assert_eq!(
            reduced,
            vec![
                DistanceRecord::new(NodeId(1), 3.0),
                DistanceRecord::new(NodeId(2), 4.5),
                DistanceRecord::new(NodeId(3), 4.5),
            ]
        );
        assert_eq!(keep_minimum(reduced.clone()), reduced);
    }

    #[test]
    fn empty_input() {
        assert!(keep_minimum(Vec::new()).is_empty());
    }
}
