use approx::assert_relative_eq;
use plotframe::core::{BandAlignment, Domain, PixelRange, Scale, ScaleKind};
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_scale_hits_both_range_endpoints_exactly(
        domain_min in -1e9f64..1e9,
        span in 1e-6f64..1e9,
        range_start in -1e6f64..1e6,
        range_span in 1e-3f64..1e6,
        inverted in any::<bool>()
    ) {
        let domain_max = domain_min + span;
        let (start, end) = if inverted {
            (range_start + range_span, range_start)
        } else {
            (range_start, range_start + range_span)
        };
        let domain = Domain::Continuous { min: domain_min, max: domain_max };
        let range = PixelRange::new(start, end).expect("finite range");
        let scale = Scale::build(&domain, range, ScaleKind::Linear, BandAlignment::default())
            .expect("build");

        prop_assert_eq!(scale.position(domain_min).expect("min"), start);
        prop_assert_eq!(scale.position(domain_max).expect("max"), end);
    }

    #[test]
    fn linear_scale_is_monotone_over_the_domain(
        domain_min in -1e6f64..1e6,
        span in 1e-3f64..1e6,
        t_low in 0.0f64..0.49,
        t_high in 0.51f64..1.0
    ) {
        let domain_max = domain_min + span;
        let domain = Domain::Continuous { min: domain_min, max: domain_max };
        let range = PixelRange::new(0.0, 1000.0).expect("range");
        let scale = Scale::build(&domain, range, ScaleKind::Linear, BandAlignment::default())
            .expect("build");

        let low = scale.position(domain_min + span * t_low).expect("low");
        let high = scale.position(domain_min + span * t_high).expect("high");
        prop_assert!(low < high);
    }

    #[test]
    fn degenerate_domain_always_maps_to_midpoint(
        pinned in -1e9f64..1e9,
        probe in -1e9f64..1e9,
        range_start in -1e5f64..1e5,
        range_end in -1e5f64..1e5
    ) {
        let domain = Domain::Continuous { min: pinned, max: pinned };
        let range = PixelRange::new(range_start, range_end).expect("range");
        let scale = Scale::build(&domain, range, ScaleKind::Linear, BandAlignment::default())
            .expect("build");
        let expected = (range_start + range_end) / 2.0;
        prop_assert_eq!(scale.position(probe).expect("probe"), expected);
    }

    #[test]
    fn log_scale_agrees_with_linear_in_ln_space(
        ln_min in -10.0f64..10.0,
        ln_span in 0.1f64..10.0,
        t in 0.0f64..1.0
    ) {
        let min = ln_min.exp();
        let max = (ln_min + ln_span).exp();
        let domain = Domain::Continuous { min, max };
        let range = PixelRange::new(0.0, 500.0).expect("range");
        let scale = Scale::build(&domain, range, ScaleKind::Log, BandAlignment::default())
            .expect("build");

        let value = (ln_min + ln_span * t).exp();
        let expected = (value.ln() - ln_min) / ln_span * 500.0;
        let actual = scale.position(value).expect("position");
        assert_relative_eq!(actual, expected, max_relative = 1e-9, epsilon = 1e-6);
    }

    #[test]
    fn band_positions_stay_inside_the_range(
        category_count in 1usize..24,
        pick in 0usize..24,
        range_end in 10.0f64..2000.0
    ) {
        let pick = pick % category_count;
        let categories: Vec<String> = (0..category_count).map(|i| format!("c{i}")).collect();
        let domain = Domain::Categorical { categories: categories.clone() };
        let range = PixelRange::new(0.0, range_end).expect("range");
        let scale = Scale::build(&domain, range, ScaleKind::Band, BandAlignment::Center)
            .expect("build");

        let position = scale.category_position(&categories[pick]).expect("position");
        prop_assert!(position >= 0.0 && position <= range_end);
    }
}
