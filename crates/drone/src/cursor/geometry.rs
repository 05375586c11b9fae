use dronectl::Point;
use std::f64::consts::TAU;

/// Offset of item `index` of `total` on a ring of `radius`, rotated by
/// `angle_base`. Items are spaced evenly, item 0 sits at `angle_base`.
///
/// A `total` of zero is treated as a single item.
pub fn orbit_position(angle_base: f64, radius: f64, index: usize, total: usize) -> Point {
    let total = total.max(1);
    let angle = angle_base + TAU * index as f64 / total as f64;
    Point::new(radius * angle.cos(), radius * angle.sin())
}

/// Offsets of every item on a ring, in index order.
pub fn ring_positions(angle_base: f64, radius: f64, total: usize) -> impl Iterator<Item = Point> {
    (0..total).map(move |i| orbit_position(angle_base, radius, i, total))
}
