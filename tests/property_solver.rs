use lightshafts::{
    domain::{
        clock::{DarknessThresholds, GameTime},
        style::RayStyle,
    },
    effect::{
        field::{RayStream, index_range, wrap_x},
        solver::{
            DAYTIME_TINT, DayArc, EARLY_SUNSET_TINT, LATE_SUNSET_TINT, NIGHT_TINT, rotation,
            spacing, time_opacity, tint_at,
        },
    },
};
use proptest::prelude::*;

fn minutes(time: GameTime) -> f32 {
    time.minutes() as f32
}

fn style() -> impl Strategy<Value = RayStyle> {
    prop_oneof![Just(RayStyle::Standard), Just(RayStyle::HighDetail)]
}

proptest! {
    #[test]
    fn morning_rotation_stays_between_dawn_and_noon(
        style in style(),
        t in 361.0f32..719.0,
    ) {
        let darkness = DarknessThresholds::default();
        let angles = style.angles();
        let angle = rotation(DayArc::at(t, &darkness), angles).to_degrees();
        let (lo, hi) = if angles.morning < angles.noon {
            (angles.morning, angles.noon)
        } else {
            (angles.noon, angles.morning)
        };
        prop_assert!(angle > lo - 1e-3 && angle < hi + 1e-3);
        prop_assert!((angle - angles.morning).abs() > 1e-4);
        prop_assert!((angle - angles.noon).abs() > 1e-4);
    }

    #[test]
    fn rotation_is_monotonic_through_the_day(
        style in style(),
        a in 360.0f32..1200.0,
        b in 360.0f32..1200.0,
    ) {
        let darkness = DarknessThresholds::default();
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let r_early = rotation(DayArc::at(early, &darkness), style.angles());
        let r_late = rotation(DayArc::at(late, &darkness), style.angles());
        // Both styles swing the same way, from their morning angle down.
        prop_assert!(r_late <= r_early + 1e-5);
    }

    #[test]
    fn opacity_is_full_before_moderate_and_gone_at_truly(
        starting in 1000i32..1300,
        before in 360.0f32..1.0e9,
    ) {
        let darkness = DarknessThresholds::from_starting(GameTime::from_minutes(starting));
        let moderate = minutes(darkness.moderate);
        let truly = minutes(darkness.truly);
        let t = before.min(moderate);
        prop_assert_eq!(time_opacity(t, &darkness), 1.0);
        prop_assert_eq!(time_opacity(truly, &darkness), 0.0);
        prop_assert_eq!(time_opacity(truly + 30.0, &darkness), 0.0);
    }

    #[test]
    fn tint_hits_each_stop_exactly(starting in 1080i32..1200) {
        let darkness = DarknessThresholds::from_starting(GameTime::from_minutes(starting));
        let early = minutes(darkness.dusk_transition_start());
        prop_assert_eq!(tint_at(early, &darkness), DAYTIME_TINT);
        prop_assert_eq!(tint_at(minutes(darkness.starting), &darkness), EARLY_SUNSET_TINT);
        prop_assert_eq!(tint_at(minutes(darkness.moderate), &darkness), LATE_SUNSET_TINT);
        prop_assert_eq!(tint_at(minutes(darkness.truly), &darkness), NIGHT_TINT);
    }

    #[test]
    fn more_intensity_never_spreads_rays_out(
        low in 1.0f32..10.0,
        extra in 0.0f32..10.0,
        height in 200.0f32..2400.0,
    ) {
        let zoom = height * 0.6 / 128.0;
        let sparse = spacing(low, zoom);
        let dense = spacing(low + extra, zoom);
        prop_assert!(dense >= 1);
        prop_assert!(dense <= sparse);
    }

    #[test]
    fn wrapped_rays_never_sit_past_the_left_margin(
        x in -50_000.0f32..5_000.0,
        extent in 1.0f32..1_000.0,
        map_width in 256.0f32..8_000.0,
    ) {
        let wrapped = wrap_x(x, extent, map_width);
        prop_assert!(wrapped >= -extent - 1e-2);
        if x >= -extent {
            prop_assert_eq!(wrapped, x);
        }
    }
}

mod ray_field {
    use std::time::Duration;

    use lightshafts::{
        app::settings::Tuning,
        domain::{clock::ClockReading, geometry::Viewport},
        effect::{sampler::EnvironmentSample, solver::solve},
    };

    use super::*;

    fn sample(time: i32, height: f32) -> EnvironmentSample {
        EnvironmentSample {
            clock: ClockReading {
                total_elapsed: Duration::from_secs(12),
                ..ClockReading::at(GameTime(time))
            },
            darkness: DarknessThresholds::default(),
            viewport: Viewport {
                x: 0.0,
                y: 0.0,
                width: height * 16.0 / 9.0,
                height,
            },
            map_width: 3000.0,
            cloud_factor: 1.0,
        }
    }

    proptest! {
        #[test]
        fn same_seed_same_field(
            seed in any::<u64>(),
            time in 600i32..1800,
            elapsed in 0.0f64..600.0,
        ) {
            let params = solve(&sample(time, 720.0), &Tuning::default(), RayStyle::Standard);
            let stream = RayStream::new(seed);
            let first = stream.field(&params, elapsed).collect::<Vec<_>>();
            let second = stream.field(&params, elapsed).collect::<Vec<_>>();
            prop_assert_eq!(first.len(), index_range(&params).len());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn colors_stay_in_range(
            seed in any::<u64>(),
            time in 600i32..2200,
            style in style(),
        ) {
            let params = solve(&sample(time, 900.0), &Tuning::default(), style);
            for ray in RayStream::new(seed).field(&params, 37.5) {
                for channel in [ray.color.r, ray.color.g, ray.color.b, ray.color.a] {
                    prop_assert!((0.0..=1.0).contains(&channel));
                }
                prop_assert!(ray.variant < style.variants().len());
            }
        }
    }
}
