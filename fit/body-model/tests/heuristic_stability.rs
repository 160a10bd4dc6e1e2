//! Crotch and knee placement must not jump under small parameter changes.

#![allow(clippy::unwrap_used)]

use body_model::{detect_landmarks, mannequin, BodyLandmark, BodyModel, LandmarkParams};
use proptest::prelude::*;

fn mannequin_sections() -> (Vec<scan_section::CrossSection>, f64) {
    let mut model = BodyModel::new(mannequin(), LandmarkParams::default()).unwrap();
    let sections = model.compute_cross_sections().unwrap().to_vec();
    let band = (sections[1].height - sections[0].height).abs();
    (sections, band)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn crotch_and_knee_move_at_most_a_few_bands(
        drop in 0.57f64..0.63,
        knee in 0.43f64..0.47,
    ) {
        let (sections, band) = mannequin_sections();
        let base = detect_landmarks(&sections, None, &LandmarkParams::default());
        let params = LandmarkParams::default()
            .with_crotch_drop_ratio(drop)
            .with_knee_ratio(knee);
        let moved = detect_landmarks(&sections, None, &params);

        let base_crotch = base.height(BodyLandmark::Crotch).unwrap();
        let crotch = moved.height(BodyLandmark::Crotch).unwrap();
        prop_assert!((crotch - base_crotch).abs() <= 3.0 * band + 1e-9);

        let base_knee = base.height(BodyLandmark::LeftKnee).unwrap();
        let knee_h = moved.height(BodyLandmark::LeftKnee).unwrap();
        prop_assert!((knee_h - base_knee).abs() <= 3.0 * band + 1e-9);
    }
}
