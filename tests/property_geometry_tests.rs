use plotframe::core::{
    AxisPosition, ChromeElement, ChromeMeasurements, DEFAULT_MAX_LAYOUT_PASSES, FixedMeasurer,
    GeometryInputs, Margins, Measured, compute_geometry, converge_geometry,
};
use proptest::prelude::*;

fn measurements(left: f64, right: f64, top: f64, bottom: f64, heading: f64) -> ChromeMeasurements {
    ChromeMeasurements {
        heading: Measured::new(0.0, heading),
        top_axis: Measured::new(0.0, top),
        right_axis: Measured::new(right, 0.0),
        bottom_axis: Measured::new(0.0, bottom),
        left_axis: Measured::new(left, 0.0),
        legend: Measured::default(),
    }
}

proptest! {
    #[test]
    fn plot_dimensions_never_go_negative(
        outer_width in 1u32..2000,
        outer_height in 1u32..2000,
        margin in 0.0f64..200.0,
        left in 0.0f64..2000.0,
        bottom in 0.0f64..2000.0
    ) {
        let mut inputs = GeometryInputs::new(outer_width, outer_height).expect("size");
        inputs.margins = Margins::uniform(margin);
        inputs.measurements = measurements(left, 0.0, 0.0, bottom, 0.0);

        let geometry = compute_geometry(&inputs);
        prop_assert!(geometry.plot_width >= 0.0);
        prop_assert!(geometry.plot_height >= 0.0);
    }

    #[test]
    fn chrome_accounting_is_exact_when_nothing_is_clamped(
        left in 0.0f64..100.0,
        right in 0.0f64..100.0,
        top in 0.0f64..100.0,
        bottom in 0.0f64..100.0,
        heading in 0.0f64..100.0
    ) {
        let mut inputs = GeometryInputs::new(1000, 1000).expect("size");
        inputs.measurements = measurements(left, right, top, bottom, heading);

        let geometry = compute_geometry(&inputs);
        prop_assert!(!geometry.degraded);
        prop_assert_eq!(geometry.plot_width, 1000.0 - left - right);
        prop_assert_eq!(geometry.plot_height, 1000.0 - top - bottom - heading);
        prop_assert_eq!(geometry.left_offset, left);
        prop_assert_eq!(geometry.top_offset, heading + top);
    }

    #[test]
    fn growing_one_chrome_element_never_grows_the_plot(
        base in 0.0f64..300.0,
        growth in 0.1f64..300.0
    ) {
        let mut inputs = GeometryInputs::new(800, 600).expect("size");
        inputs.measurements = measurements(base, 0.0, 0.0, 0.0, 0.0);
        let before = compute_geometry(&inputs);

        inputs.measurements = measurements(base + growth, 0.0, 0.0, 0.0, 0.0);
        let after = compute_geometry(&inputs);

        prop_assert!(after.plot_width <= before.plot_width);
        prop_assert_eq!(after.plot_height, before.plot_height);
    }

    #[test]
    fn geometry_independent_measurers_always_converge(
        left in 0.0f64..200.0,
        bottom in 0.0f64..200.0,
        heading in 0.0f64..200.0
    ) {
        let measurer = FixedMeasurer::new()
            .with_size(ChromeElement::Axis(AxisPosition::Left), Measured::new(left, 0.0))
            .with_size(ChromeElement::Axis(AxisPosition::Bottom), Measured::new(0.0, bottom))
            .with_size(ChromeElement::Heading, Measured::new(0.0, heading));
        let inputs = GeometryInputs::new(1000, 800).expect("size");

        let layout = converge_geometry(&inputs, &measurer, DEFAULT_MAX_LAYOUT_PASSES);
        prop_assert!(layout.converged);
        prop_assert!(layout.passes <= 2);
        prop_assert_eq!(
            layout.measurements.get(ChromeElement::Axis(AxisPosition::Left)),
            Measured::new(left, 0.0)
        );
    }

    #[test]
    fn seeding_with_the_fixed_point_converges_in_one_pass(
        left in 0.0f64..200.0,
        bottom in 0.0f64..200.0
    ) {
        let measurer = FixedMeasurer::new()
            .with_size(ChromeElement::Axis(AxisPosition::Left), Measured::new(left, 0.0))
            .with_size(ChromeElement::Axis(AxisPosition::Bottom), Measured::new(0.0, bottom));
        let mut inputs = GeometryInputs::new(1000, 800).expect("size");
        inputs.measurements = measurements(left, 0.0, 0.0, bottom, 0.0);

        let layout = converge_geometry(&inputs, &measurer, DEFAULT_MAX_LAYOUT_PASSES);
        prop_assert!(layout.converged);
        prop_assert_eq!(layout.passes, 1);
    }
}
