use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{AxisPosition, PlotGeometry};

/// Reported bounding box of one rendered chrome element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measured {
    pub width: f64,
    pub height: f64,
}

impl Measured {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Variably-sized elements whose bounding boxes feed viewport sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChromeElement {
    Heading,
    Axis(AxisPosition),
    Legend,
}

/// Measured sizes of all chrome elements for one cycle.
///
/// Before any element has rendered, every entry is zero; real sizes arrive
/// from the previous completed cycle, which is what introduces the one-cycle
/// measurement lag the sizing engine reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChromeMeasurements {
    pub heading: Measured,
    pub top_axis: Measured,
    pub right_axis: Measured,
    pub bottom_axis: Measured,
    pub left_axis: Measured,
    pub legend: Measured,
}

impl ChromeMeasurements {
    #[must_use]
    pub fn get(&self, element: ChromeElement) -> Measured {
        match element {
            ChromeElement::Heading => self.heading,
            ChromeElement::Axis(AxisPosition::Top) => self.top_axis,
            ChromeElement::Axis(AxisPosition::Right) => self.right_axis,
            ChromeElement::Axis(AxisPosition::Bottom) => self.bottom_axis,
            ChromeElement::Axis(AxisPosition::Left) => self.left_axis,
            ChromeElement::Legend => self.legend,
        }
    }

    pub fn set(&mut self, element: ChromeElement, measured: Measured) {
        match element {
            ChromeElement::Heading => self.heading = measured,
            ChromeElement::Axis(AxisPosition::Top) => self.top_axis = measured,
            ChromeElement::Axis(AxisPosition::Right) => self.right_axis = measured,
            ChromeElement::Axis(AxisPosition::Bottom) => self.bottom_axis = measured,
            ChromeElement::Axis(AxisPosition::Left) => self.left_axis = measured,
            ChromeElement::Legend => self.legend = measured,
        }
    }

    pub const ALL_ELEMENTS: [ChromeElement; 6] = [
        ChromeElement::Heading,
        ChromeElement::Axis(AxisPosition::Top),
        ChromeElement::Axis(AxisPosition::Right),
        ChromeElement::Axis(AxisPosition::Bottom),
        ChromeElement::Axis(AxisPosition::Left),
        ChromeElement::Legend,
    ];
}

/// Reports the bounding box a chrome element would occupy under the given
/// geometry.
///
/// Real hosts back this with renderer text metrics; tests and headless usage
/// use the doubles below.
pub trait ChromeMeasurer {
    fn measure(&self, element: ChromeElement, geometry: &PlotGeometry) -> Measured;
}

/// Reports zero for everything; the headless default.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroMeasurer;

impl ChromeMeasurer for ZeroMeasurer {
    fn measure(&self, _element: ChromeElement, _geometry: &PlotGeometry) -> Measured {
        Measured::default()
    }
}

/// Returns preset sizes per element; unset elements measure zero.
///
/// Used by tests to drive the convergence loop deterministically.
#[derive(Debug, Default, Clone)]
pub struct FixedMeasurer {
    sizes: IndexMap<ChromeElement, Measured>,
}

impl FixedMeasurer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_size(mut self, element: ChromeElement, measured: Measured) -> Self {
        self.sizes.insert(element, measured);
        self
    }
}

impl ChromeMeasurer for FixedMeasurer {
    fn measure(&self, element: ChromeElement, _geometry: &PlotGeometry) -> Measured {
        self.sizes.get(&element).copied().unwrap_or_default()
    }
}

/// Glyph-count text estimate, assuming ~0.6em average advance and 1em height.
///
/// Good enough for early layout and demos; hosts with a shaping backend
/// should implement [`ChromeMeasurer`] against real metrics instead.
#[derive(Debug, Clone)]
pub struct HeuristicTextMeasurer {
    font_size_px: f64,
    texts: IndexMap<ChromeElement, Vec<String>>,
}

impl HeuristicTextMeasurer {
    #[must_use]
    pub fn new(font_size_px: f64) -> Self {
        Self {
            font_size_px,
            texts: IndexMap::new(),
        }
    }

    /// Registers the text lines an element will render.
    #[must_use]
    pub fn with_texts(mut self, element: ChromeElement, texts: Vec<String>) -> Self {
        self.texts.insert(element, texts);
        self
    }

    /// Estimated bounding box of a single text run.
    #[must_use]
    pub fn measure_text(&self, text: &str) -> Measured {
        Measured::new(
            0.6 * self.font_size_px * text.chars().count() as f64,
            self.font_size_px,
        )
    }
}

impl ChromeMeasurer for HeuristicTextMeasurer {
    fn measure(&self, element: ChromeElement, _geometry: &PlotGeometry) -> Measured {
        let Some(texts) = self.texts.get(&element) else {
            return Measured::default();
        };

        let mut widest = 0.0f64;
        for text in texts {
            widest = widest.max(self.measure_text(text).width);
        }
        let line_count = texts.len() as f64;
        match element {
            // Axis boxes stack vertically on left/right and reserve the widest
            // label; top/bottom reserve one line of height.
            ChromeElement::Axis(position) if !position.is_horizontal() => {
                Measured::new(widest, line_count * self.font_size_px)
            }
            ChromeElement::Axis(_) | ChromeElement::Heading => {
                Measured::new(widest, self.font_size_px * 1.4)
            }
            ChromeElement::Legend => Measured::new(widest, line_count * self.font_size_px * 1.2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ChromeElement, ChromeMeasurements, ChromeMeasurer, FixedMeasurer, HeuristicTextMeasurer,
        Measured,
    };
    use crate::core::{AxisPosition, PlotGeometry};

    #[test]
    fn measurements_get_set_round_trip() {
        let mut measurements = ChromeMeasurements::default();
        for element in ChromeMeasurements::ALL_ELEMENTS {
            measurements.set(element, Measured::new(10.0, 20.0));
            assert_eq!(measurements.get(element), Measured::new(10.0, 20.0));
        }
    }

    #[test]
    fn fixed_measurer_defaults_to_zero() {
        let measurer =
            FixedMeasurer::new().with_size(ChromeElement::Heading, Measured::new(120.0, 18.0));
        let geometry = PlotGeometry::default();
        assert_eq!(
            measurer.measure(ChromeElement::Heading, &geometry),
            Measured::new(120.0, 18.0)
        );
        assert_eq!(
            measurer.measure(ChromeElement::Legend, &geometry),
            Measured::default()
        );
    }

    #[test]
    fn heuristic_measurer_reserves_widest_label() {
        let measurer = HeuristicTextMeasurer::new(10.0).with_texts(
            ChromeElement::Axis(AxisPosition::Left),
            vec!["5".to_owned(), "1000".to_owned()],
        );
        let measured = measurer.measure(
            ChromeElement::Axis(AxisPosition::Left),
            &PlotGeometry::default(),
        );
        assert_eq!(measured.width, 0.6 * 10.0 * 4.0);
        assert_eq!(measured.height, 20.0);
    }
}
