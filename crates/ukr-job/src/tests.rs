//! Integration tests for ukr-job.

#[cfg(test)]
mod helpers {
    use ukr_core::{Coord, NodeId, RoutingConfig, WeightColumn};
    use ukr_graph::{GraphBuilder, PointRecord};
    use ukr_routing::TargetReport;

    use crate::{CancelToken, JobObserver, JobState, JobSummary, RoutingPlan};

    /// 10 m square cycle: (0,0), (10,0), (0,10), (10,10).
    pub fn square() -> GraphBuilder {
        let mut b = GraphBuilder::new();
        let n: Vec<NodeId> = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)]
            .into_iter()
            .map(|(e, n)| b.add_node(Coord::new(e, n)))
            .collect();
        b.add_road(n[0], n[1], 10.0);
        b.add_road(n[1], n[3], 10.0);
        b.add_road(n[3], n[2], 10.0);
        b.add_road(n[2], n[0], 10.0);
        b
    }

    /// 21-node road along y = 0 spaced 100 m.
    pub fn road() -> GraphBuilder {
        let mut b = GraphBuilder::new();
        let ids: Vec<NodeId> = (0..21).map(|i| b.add_node(Coord::new(i as f64 * 100.0, 0.0))).collect();
        for w in ids.windows(2) {
            b.add_road(w[0], w[1], 100.0);
        }
        b
    }

    pub fn length_config() -> RoutingConfig {
        RoutingConfig { weights: WeightColumn::Length, ..RoutingConfig::default() }
    }

    pub fn road_pois() -> Vec<PointRecord> {
        vec![
            PointRecord::new("west", 0.0, 5.0),
            PointRecord::new("middle", 1_000.0, 5.0),
            PointRecord::new("east", 2_000.0, 5.0),
        ]
    }

    pub fn road_refs() -> Vec<PointRecord> {
        vec![
            PointRecord::new("r300", 300.0, -5.0),
            PointRecord::new("r1200", 1_200.0, -5.0),
            PointRecord::new("r1900", 1_900.0, -5.0),
        ]
    }

    /// Records every callback.
    #[derive(Default)]
    pub struct Recorder {
        pub states:  Vec<JobState>,
        pub plan:    Option<RoutingPlan>,
        pub reports: Vec<TargetReport>,
        pub ended:   Option<JobSummary>,
        /// Fire this token after the first routed POI.
        pub cancel_after_first: Option<CancelToken>,
    }

    impl JobObserver for Recorder {
        fn on_state(&mut self, state: JobState) {
            self.states.push(state);
        }

        fn on_routing_start(&mut self, plan: &RoutingPlan) {
            self.plan = Some(*plan);
        }

        fn on_target_done(&mut self, report: &TargetReport) {
            self.reports.push(report.clone());
            if let Some(t) = &self.cancel_after_first {
                t.cancel();
            }
        }

        fn on_job_end(&mut self, summary: &JobSummary) {
            self.ended = Some(summary.clone());
        }
    }
}

// ── Full runs ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use ukr_core::{Strategy, WeightColumn};
    use ukr_graph::PointRecord;
    use ukr_output::MemoryStore;

    use super::helpers::{length_config, road, road_pois, road_refs, square, Recorder};
    use crate::{JobError, JobState, JobStatus, NoopObserver, RoutingJobBuilder};

    #[test]
    fn square_scenario() {
        let job = RoutingJobBuilder::new(length_config(), square())
            .pois(vec![PointRecord::new("poi", 5.0, 5.0)])
            .reference_points(vec![PointRecord::new("corner", 10.0, 10.0)])
            .build()
            .unwrap();
        let mut obs = Recorder::default();
        let out = job.run(&mut MemoryStore::new(), &mut obs).unwrap();

        assert_eq!(out.status, JobStatus::Completed);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].identifier, "corner");
        // √50 + 10 + 10, plus the 0.01 m floor on the reference's zero-length edge.
        assert!((out.rows[0].distance - (50f64.sqrt() + 20.01)).abs() < 1e-9);
        assert_eq!(
            obs.states,
            [
                JobState::Init,
                JobState::AttachingInputs,
                JobState::AttachingOutputs,
                JobState::Routing,
                JobState::Reducing,
                JobState::Done,
            ]
        );
        assert_eq!(obs.ended.unwrap().reference_points_reached, 1);
    }

    #[test]
    fn each_reference_gets_its_nearest_poi() {
        let job = RoutingJobBuilder::new(length_config(), road())
            .pois(road_pois())
            .reference_points(road_refs())
            .build()
            .unwrap();
        let out = job.run(&mut MemoryStore::new(), &mut NoopObserver).unwrap();

        let get = |id: &str| out.rows.iter().find(|r| r.identifier == id).map(|r| r.distance);
        // 5 m attachment on each side plus the road between.
        assert!((get("r300").unwrap() - 310.0).abs() < 1e-9);
        assert!((get("r1200").unwrap() - 210.0).abs() < 1e-9);
        assert!((get("r1900").unwrap() - 110.0).abs() < 1e-9);
        assert!(out.rows.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(out.summary.total, 3);
        assert_eq!(out.summary.routed, 3);
    }

    #[test]
    fn strategies_agree() {
        let run = |strategy| {
            let cfg = ukr_core::RoutingConfig { strategy, ..length_config() };
            RoutingJobBuilder::new(cfg, road())
                .pois(road_pois())
                .reference_points(road_refs())
                .build()
                .unwrap()
                .run(&mut MemoryStore::new(), &mut NoopObserver)
                .unwrap()
                .rows
        };
        let per = run(Strategy::PerSource);
        let multi = run(Strategy::MultiSourceBatch);
        assert_eq!(per.len(), multi.len());
        for (a, b) in per.iter().zip(&multi) {
            assert_eq!(a.identifier, b.identifier);
            assert!((a.distance - b.distance).abs() < 1e-9);
        }
    }

    #[test]
    fn unroutable_pois_are_counted_not_fatal() {
        let mut cfg = length_config();
        cfg.min_buffer = 50.0;
        cfg.max_buffer = 150.0;
        cfg.fallback = false;
        let job = RoutingJobBuilder::new(cfg, road())
            .pois(road_pois())
            .reference_points(road_refs())
            .build()
            .unwrap();
        let out = job.run(&mut MemoryStore::new(), &mut NoopObserver).unwrap();

        assert_eq!(out.status, JobStatus::Completed);
        assert_eq!(out.summary.buffer_exceeded, 3);
        assert!(out.rows.is_empty());
    }

    #[test]
    fn fallback_routes_on_full_graph() {
        let mut cfg = length_config();
        cfg.min_buffer = 50.0;
        cfg.max_buffer = 150.0;
        let out = RoutingJobBuilder::new(cfg, road())
            .pois(road_pois())
            .reference_points(road_refs())
            .build()
            .unwrap()
            .run(&mut MemoryStore::new(), &mut NoopObserver)
            .unwrap();
        assert_eq!(out.summary.fallback, 3);
        assert_eq!(out.summary.routed, 3);
        assert_eq!(out.rows.len(), 3);
    }

    #[test]
    fn cutoff_leaves_far_references_out() {
        let mut cfg = length_config();
        cfg.cutoff = Some(250.0);
        let out = RoutingJobBuilder::new(cfg, road())
            .pois(road_pois())
            .reference_points(road_refs())
            .build()
            .unwrap()
            .run(&mut MemoryStore::new(), &mut NoopObserver)
            .unwrap();
        let ids: Vec<&str> = out.rows.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, ["r1900", "r1200"]);
        assert_eq!(out.summary.unreachable, 1);
    }

    #[test]
    fn invalid_config_rejected_at_build() {
        let mut cfg = length_config();
        cfg.min_buffer = 10_000.0;
        cfg.max_buffer = 1_000.0;
        let err = RoutingJobBuilder::new(cfg, square()).build().err().expect("must reject");
        assert!(matches!(err, JobError::Config(_)));
    }

    #[test]
    fn malformed_graph_aborts_before_routing() {
        let mut b = square();
        b.add_road(ukr_core::NodeId(0), ukr_core::NodeId(1), 0.0);
        let mut obs = Recorder::default();
        let err = RoutingJobBuilder::new(length_config(), b)
            .pois(vec![PointRecord::new("poi", 5.0, 5.0)])
            .reference_points(vec![PointRecord::new("r", 10.0, 10.0)])
            .build()
            .unwrap()
            .run(&mut MemoryStore::new(), &mut obs)
            .unwrap_err();
        assert!(matches!(err, JobError::Graph(_)));
        assert!(!obs.states.contains(&JobState::Routing));
    }

    #[test]
    fn nan_rows_dropped_and_counted() {
        let mut pois = road_pois();
        pois.push(PointRecord::new("broken", f64::NAN, 0.0));
        let out = RoutingJobBuilder::new(length_config(), road())
            .pois(pois)
            .reference_points(road_refs())
            .build()
            .unwrap()
            .run(&mut MemoryStore::new(), &mut NoopObserver)
            .unwrap();
        assert_eq!(out.summary.total, 3);
        assert_eq!(out.summary.dropped_pois, 1);
    }

    #[test]
    fn time_weighted_distances_in_minutes() {
        let cfg = ukr_core::RoutingConfig { weights: WeightColumn::TimeWeighted, ..length_config() };
        let out = RoutingJobBuilder::new(cfg, road())
            .pois(vec![PointRecord::new("p", 0.0, 0.0)])
            .reference_points(vec![PointRecord::new("r", 1_000.0, 0.0)])
            .build()
            .unwrap()
            .run(&mut MemoryStore::new(), &mut NoopObserver)
            .unwrap();
        // 1000 m of road plus two floored 0.01 m attachment edges.
        let expected = ukr_core::weights::vehicle_minutes(1_000.0)
            + 2.0 * ukr_core::weights::vehicle_minutes(0.01);
        assert!((out.rows[0].distance - expected).abs() < 1e-9);
    }
}

// ── Checkpoint & cancellation ─────────────────────────────────────────────────

#[cfg(test)]
mod resume_tests {
    use ukr_core::{DistanceRecord, NodeId, TargetId};
    use ukr_output::{DistanceStore, MemoryStore};

    use super::helpers::{length_config, road, road_pois, road_refs, Recorder};
    use crate::{CancelToken, JobState, JobStatus, RoutingJobBuilder};

    fn job(cancel: CancelToken) -> crate::RoutingJob {
        RoutingJobBuilder::new(length_config(), road())
            .pois(road_pois())
            .reference_points(road_refs())
            .cancel_token(cancel)
            .build()
            .unwrap()
    }

    #[test]
    fn processed_targets_are_skipped() {
        let mut store = MemoryStore::new();
        // A previous run recorded POI 0 reaching the r300 node (node 24).
        store.record(&[TargetId(0)], &[DistanceRecord::new(NodeId(24), 310.0)]).unwrap();

        let mut obs = Recorder::default();
        let out = job(CancelToken::new()).run(&mut store, &mut obs).unwrap();
        assert_eq!(out.summary.skipped, 1);
        assert_eq!(obs.plan.unwrap().targets, 2);
        assert!(obs.reports.iter().all(|r| r.target != TargetId(0)));
        assert!(out.rows.iter().any(|r| r.identifier == "r300"));
    }

    #[test]
    fn cancelled_before_routing_is_interrupted() {
        let token = CancelToken::new();
        token.cancel();
        let mut obs = Recorder::default();
        let out = job(token).run(&mut MemoryStore::new(), &mut obs).unwrap();

        assert_eq!(out.status, JobStatus::Interrupted);
        assert_eq!(out.summary.cancelled, 3);
        assert!(out.rows.is_empty());
        assert_eq!(obs.states.last(), Some(&JobState::Interrupted));
        assert!(!obs.states.contains(&JobState::Reducing));
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn interrupt_then_resume_matches_uninterrupted_run() {
        use ukr_output::CsvStore;

        use crate::NoopObserver;

        let dir = tempfile::tempdir().expect("create temp dir");

        let token = CancelToken::new();
        let mut obs = Recorder { cancel_after_first: Some(token.clone()), ..Recorder::default() };
        let first = job(token).run(&mut CsvStore::open(dir.path()).unwrap(), &mut obs).unwrap();
        assert_eq!(first.status, JobStatus::Interrupted);
        assert_eq!(first.summary.routed, 1);
        assert_eq!(first.summary.cancelled, 2);

        let second = job(CancelToken::new())
            .run(&mut CsvStore::open(dir.path()).unwrap(), &mut NoopObserver)
            .unwrap();
        assert_eq!(second.status, JobStatus::Completed);
        assert_eq!(second.summary.skipped, 1);
        assert_eq!(second.summary.routed, 2);

        let fresh = job(CancelToken::new()).run(&mut MemoryStore::new(), &mut NoopObserver).unwrap();
        assert_eq!(second.rows, fresh.rows);
    }
}
