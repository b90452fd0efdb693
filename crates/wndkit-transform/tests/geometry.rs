//! Property tests for the space mapping.

use proptest::prelude::{prop_assert_eq, proptest};

use wndkit_model::{Point, Rect};
use wndkit_transform::{round_coordinate, to_descriptor_space, to_drawing_space};

proptest! {
    /// The mapping inverts exactly for any rectangle and anchor.
    #[test]
    fn mapping_is_exactly_invertible(
        x in -8192i32..8192,
        y in -8192i32..8192,
        w in 0i32..8192,
        h in 0i32..8192,
        ax in -4096i32..4096,
        ay in -4096i32..4096,
    ) {
        let rect = Rect::new(x, y, w, h);
        let anchor = Point::new(ax, ay);
        let there = to_drawing_space(rect, anchor);
        prop_assert_eq!(to_descriptor_space(there, anchor), rect);
    }

    /// Integral geometry survives a float excursion within one unit.
    #[test]
    fn float_round_trip_never_drifts(
        x in -4096i32..4096,
        jitter in -0.49f64..0.49,
    ) {
        let as_float = f64::from(x) + jitter;
        prop_assert_eq!(round_coordinate(as_float), x);
    }

    /// Repeated round trips are stable after the first rounding.
    #[test]
    fn repeated_round_trips_are_stable(
        x in -4096i32..4096,
        y in -4096i32..4096,
        ax in -512i32..512,
        ay in -512i32..512,
    ) {
        let anchor = Point::new(ax, ay);
        let mut rect = Rect::new(x, y, 32, 32);
        let first = to_descriptor_space(to_drawing_space(rect, anchor), anchor);
        for _ in 0..8 {
            rect = to_descriptor_space(to_drawing_space(rect, anchor), anchor);
        }
        prop_assert_eq!(rect, first);
    }
}
