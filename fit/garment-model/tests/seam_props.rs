//! Seam tracing and island counting invariants.

use garment_model::{count_islands, trace_chains};
use nalgebra::{Point2, Rotation2};
use proptest::prelude::*;

fn edge_set() -> impl Strategy<Value = Vec<(u32, u32)>> {
    proptest::collection::btree_set((0u32..30, 0u32..30), 0..60).prop_map(|set| {
        let mut edges: Vec<_> = set
            .into_iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    })
}

proptest! {
    #[test]
    fn every_edge_lands_in_exactly_one_chain(edges in edge_set()) {
        let chains = trace_chains(&edges);
        let mut seen: Vec<(u32, u32)> = chains
            .iter()
            .flat_map(|c| c.windows(2).map(|w| (w[0].min(w[1]), w[0].max(w[1]))))
            .collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, edges);
    }

    #[test]
    fn island_count_ignores_rigid_motion(
        points in proptest::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..80),
        angle in 0.0f64..std::f64::consts::TAU,
        dx in -1000.0f64..1000.0,
        dy in -1000.0f64..1000.0,
    ) {
        let original: Vec<Point2<f64>> = points.iter().map(|&(x, y)| Point2::new(x, y)).collect();
        let rotation = Rotation2::new(angle);
        let moved: Vec<Point2<f64>> = original
            .iter()
            .map(|p| rotation * p + nalgebra::Vector2::new(dx, dy))
            .collect();
        // Pairs within rounding of the linkage distance may flip.
        let islands = count_islands(&original, 50.0);
        let strict = count_islands(&original, 50.0 - 1e-6);
        let loose = count_islands(&original, 50.0 + 1e-6);
        let after = count_islands(&moved, 50.0);
        prop_assert!(after <= strict && after >= loose, "{islands} vs {after}");
    }
}
