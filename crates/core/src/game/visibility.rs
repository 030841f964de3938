//! Line-of-sight and visible-set queries over the tile grid.
//! Pure functions of the map; nothing here mutates state, so callers may query
//! as often as they like within a turn.

use std::collections::BTreeSet;

use crate::state::Map;
use crate::types::Pos;

/// Bresenham walk from `from` to `to`, sampling every cell strictly between the
/// endpoints. The endpoints themselves never block.
pub fn line_of_sight(map: &Map, from: Pos, to: Pos) -> bool {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = (to.x - from.x).signum();
    let sy = (to.y - from.y).signum();
    let mut err = dx + dy;
    let mut x = from.x;
    let mut y = from.y;

    loop {
        if x == to.x && y == to.y {
            return true;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += sx;
        }
        if doubled <= dx {
            err += dx;
            y += sy;
        }
        if x == to.x && y == to.y {
            return true;
        }
        if map.blocks_sight(Pos { y, x }) {
            return false;
        }
    }
}

fn within_radius(origin: Pos, target: Pos, radius: u32) -> bool {
    let dx = i64::from(target.x - origin.x);
    let dy = i64::from(target.y - origin.y);
    let r = i64::from(radius);
    dx * dx + dy * dy <= r * r
}

/// Every in-bounds cell within Euclidean `radius` of `origin` that has line of sight.
pub fn visible_set(map: &Map, origin: Pos, radius: u32) -> BTreeSet<Pos> {
    let r = radius as i32;
    let mut visible = BTreeSet::new();
    for y in (origin.y - r)..=(origin.y + r) {
        for x in (origin.x - r)..=(origin.x + r) {
            let cell = Pos { y, x };
            if map.in_bounds(cell)
                && within_radius(origin, cell, radius)
                && line_of_sight(map, origin, cell)
            {
                visible.insert(cell);
            }
        }
    }
    visible
}

/// Membership test for [`visible_set`] without building the whole set.
pub fn can_see(map: &Map, origin: Pos, radius: u32, target: Pos) -> bool {
    map.in_bounds(target)
        && within_radius(origin, target, radius)
        && line_of_sight(map, origin, target)
}
