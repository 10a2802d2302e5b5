//! Point-in-polygon containment.

use glam::Vec2;

/// Returns true if `p` lies inside the polygon described by `outline`.
///
/// Uses the even-odd ray-cast rule over the closed outline. Outlines with
/// fewer than three vertices contain nothing. Points exactly on an edge may
/// land on either side; callers needing boundary guarantees should pad the
/// outline.
#[must_use]
pub fn contains_point(outline: &[Vec2], p: Vec2) -> bool {
    if outline.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = outline.len() - 1;
    for i in 0..outline.len() {
        let (vi, vj) = (outline[i], outline[j]);
        if (vi.y > p.y) != (vj.y > p.y) {
            let x_cross = vj.x + (p.y - vj.y) / (vi.y - vj.y) * (vi.x - vj.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
