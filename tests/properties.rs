//! Property tests for the numeric invariants of the pipeline.

mod common;

use common::{jittered_face, scaled_face, synthetic_face, MESH_SIZE};
use fas_face::composite::{aggregate, DomainOutcome, FasDomain, FasDomainScore};
use fas_face::discord::{analyze_discord, DiscordThresholds};
use fas_face::volume::fan_volume;
use fas_face::{
    analyze_symmetry, Blendshapes, Calibration, ClinicalZone, Engine, FacialMeasurements,
    FrameInput, Point3,
};
use proptest::prelude::*;

fn landmark_noise() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.005f64..0.005, MESH_SIZE * 3)
}

fn blendshape_set() -> impl Strategy<Value = Blendshapes> {
    let names: Vec<&'static str> = ClinicalZone::ALL
        .iter()
        .flat_map(|z| z.blendshape_names().iter().copied())
        .collect();
    prop::collection::vec(0.0f64..=1.0, names.len())
        .prop_map(move |scores| names.iter().copied().zip(scores).collect())
}

proptest! {
    #[test]
    fn calibration_round_trip(
        scale in 0.4f64..1.6,
        dx in -0.1f64..0.1,
        dy in -0.1f64..0.1,
        reference in 50.0f64..80.0,
    ) {
        let face = scaled_face(&synthetic_face(), scale, dx, dy);
        let cal = Calibration::from_landmarks(&face, reference).unwrap();
        prop_assert!((cal.scale_factor * cal.normalized_ipd - reference).abs() < 1e-6);
        prop_assert!(cal.scale_factor.is_finite() && cal.scale_factor > 0.0);
        prop_assert!((0.0..=1.0).contains(&cal.confidence));
    }

    #[test]
    fn partitions_sum_to_hundred(noise in landmark_noise()) {
        let face = jittered_face(&synthetic_face(), &noise);
        let m = FacialMeasurements::from_landmarks(&face).unwrap();
        prop_assert!((m.thirds().iter().sum::<f64>() - 100.0).abs() < 0.1);
        prop_assert!((m.fifths().iter().sum::<f64>() - 100.0).abs() < 0.1);
        prop_assert!(m.thirds().iter().chain(m.fifths().iter()).all(|p| *p >= 0.0));
    }

    #[test]
    fn mirrored_face_stays_symmetric(
        scale in 0.5f64..1.5,
        dx in -0.1f64..0.1,
        dy in -0.1f64..0.1,
    ) {
        let face = scaled_face(&synthetic_face(), scale, dx, dy);
        let report = analyze_symmetry(&face).unwrap();
        for pair in &report.pairs {
            prop_assert!(pair.distance < 1e-9, "{:?}", pair);
        }
        prop_assert!(report.global_vertical_asymmetry < 1e-9);
    }

    #[test]
    fn short_surfaces_have_no_volume(
        points in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0), 0..3),
        anchor in (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0),
    ) {
        let surface: Vec<Point3> =
            points.into_iter().map(|(x, y, z)| Point3::new(x, y, z)).collect();
        let anchor = Point3::new(anchor.0, anchor.1, anchor.2);
        prop_assert_eq!(fan_volume(&surface, anchor), 0.0);
    }

    #[test]
    fn hyperactivity_is_strict(blendshapes in blendshape_set()) {
        let t = DiscordThresholds::default();
        let r = analyze_discord(Some(&blendshapes), &t);
        for z in &r.zones {
            prop_assert!((0.0..=1.0).contains(&z.score));
            prop_assert_eq!(z.is_hyperactive, z.score > t.hyperactivity());
            prop_assert_eq!(z.is_active, z.score > t.activity());
        }
        prop_assert!(r.global_score <= 100);
    }

    #[test]
    fn single_domain_global_equals_its_score(score in 0.0f64..=100.0, which in 0usize..5) {
        let domains = FasDomain::ALL
            .into_iter()
            .enumerate()
            .map(|(i, d)| {
                let outcome = if i == which {
                    DomainOutcome::computed(score)
                } else {
                    DomainOutcome::unavailable("excluded")
                };
                FasDomainScore::new(d, outcome)
            })
            .collect();
        let r = aggregate(domains);
        prop_assert_eq!(r.global_score, score.round() as u32);
    }

    #[test]
    fn analysis_is_idempotent(
        noise in landmark_noise(),
        blendshapes in blendshape_set(),
        skin in prop::option::of(0.0f64..=100.0),
    ) {
        let engine = Engine::default();
        let mut input = FrameInput::new(jittered_face(&synthetic_face(), &noise))
            .with_blendshapes(blendshapes);
        input.skin_quality = skin;
        prop_assert_eq!(engine.analyze(&input), engine.analyze(&input));
    }
}
