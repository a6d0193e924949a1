//! Closed solids swept through a sequence of rings.
//!
//! Extrusion, loft, revolve and twist extrusion all reduce to the same
//! shape: a list of 3D rings with matching point counts, joined by side
//! faces and optionally closed by end caps.

use glam::{DVec2, DVec3};

use super::body::Body;
use super::polygon::Polygon;
use crate::kernel::wire::triangulate;
use crate::kernel::{CadError, CadResult, Wire2D};

/// Relative flatness tolerance for keeping a side quad as one face.
const PLANARITY_TOLERANCE: f64 = 1e-9;

/// One cross-section of a sweep.
pub(super) struct Section {
    /// Ring points in world space.
    pub ring: Vec<DVec3>,
    /// The same points in the section's own plane (used for cap triangulation).
    pub outline: Vec<DVec2>,
}

impl Section {
    pub fn new(outline: &[DVec2], to_world: impl Fn(DVec2) -> DVec3) -> Self {
        Self {
            ring: outline.iter().map(|p| to_world(*p)).collect(),
            outline: outline.to_vec(),
        }
    }
}

/// Validate a profile and return its points wound counter-clockwise.
pub(super) fn profile_points(profile: &Wire2D) -> CadResult<Vec<DVec2>> {
    if profile.points.len() < 3 {
        return Err(CadError::InvalidProfile(format!(
            "profile needs at least 3 points, got {}",
            profile.points.len()
        )));
    }
    if profile.signed_area().abs() < 1e-12 {
        return Err(CadError::InvalidProfile("profile has zero area".into()));
    }
    Ok(profile.to_ccw().points)
}

/// Join `sections` into a closed body.
///
/// With `closed_loop` the last section connects back to the first and no
/// caps are built (full revolutions). The result is flipped if the sweep
/// direction produced an inside-out surface.
pub(super) fn sweep(sections: &[Section], closed_loop: bool) -> CadResult<Body> {
    let Some(first) = sections.first() else {
        return Err(CadError::InvalidProfile("sweep needs at least one section".into()));
    };
    let count = first.ring.len();
    if sections.iter().any(|s| s.ring.len() != count) {
        return Err(CadError::InvalidProfile(
            "all sections must have the same number of points".into(),
        ));
    }
    if sections.len() < 2 {
        return Err(CadError::InvalidProfile("sweep needs at least two sections".into()));
    }

    let mut polygons = Vec::new();
    let bands = if closed_loop {
        sections.len()
    } else {
        sections.len() - 1
    };
    for k in 0..bands {
        let lower = &sections[k].ring;
        let upper = &sections[(k + 1) % sections.len()].ring;
        for j in 0..count {
            let next = (j + 1) % count;
            push_quad(&mut polygons, [lower[j], lower[next], upper[next], upper[j]]);
        }
    }

    if !closed_loop {
        let last = &sections[sections.len() - 1];
        push_cap(&mut polygons, first, true);
        push_cap(&mut polygons, last, false);
    }

    let body = Body::from_polygons(polygons).oriented_outward();
    if body.volume().abs() < 1e-12 {
        return Err(CadError::DegenerateResult("sweep encloses no volume".into()));
    }
    Ok(body)
}

/// Add a side quad as one face when flat, otherwise as two triangles.
fn push_quad(polygons: &mut Vec<Polygon>, quad: [DVec3; 4]) {
    if let Some(polygon) = Polygon::new(quad.to_vec()) {
        let scale = quad
            .iter()
            .map(|v| v.distance(quad[0]))
            .fold(0.0, f64::max)
            .max(1.0);
        let flat = quad
            .iter()
            .all(|v| polygon.plane.signed_distance(*v).abs() <= PLANARITY_TOLERANCE * scale);
        if flat {
            polygons.push(polygon);
            return;
        }
    }
    let [a, b, c, d] = quad;
    polygons.extend(Polygon::new(vec![a, b, c]));
    polygons.extend(Polygon::new(vec![a, c, d]));
}

/// Close one end of the sweep. The start cap faces backwards.
fn push_cap(polygons: &mut Vec<Polygon>, section: &Section, reverse: bool) {
    // Repeated outline points (zero-radius corners) carry no area.
    let mut indices: Vec<usize> = Vec::with_capacity(section.outline.len());
    for (i, p) in section.outline.iter().enumerate() {
        let repeated = indices
            .last()
            .is_some_and(|&prev| section.outline[prev].distance_squared(*p) < 1e-18);
        if !repeated {
            indices.push(i);
        }
    }
    while indices.len() > 1
        && section.outline[indices[0]].distance_squared(section.outline[indices[indices.len() - 1]])
            < 1e-18
    {
        indices.pop();
    }
    let outline: Vec<DVec2> = indices.iter().map(|&i| section.outline[i]).collect();

    let convex = Wire2D::new(outline.clone()).is_convex();
    let faces: Vec<Vec<usize>> = if convex {
        vec![(0..outline.len()).collect()]
    } else {
        triangulate(&outline).into_iter().map(|t| t.to_vec()).collect()
    };

    for face in faces {
        let mut loop3: Vec<DVec3> = face.iter().map(|&i| section.ring[indices[i]]).collect();
        if reverse {
            loop3.reverse();
        }
        polygons.extend(Polygon::new(loop3));
    }
}
