//! Building blocks shared by the part generators.
//!
//! Edge treatments that a b-rep kernel would apply after the fact (fillets,
//! chamfers) are built directly into the sweep here: a [`Prism`] is lofted
//! through inset copies of its outline.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DVec2, DVec3};
use pf_cad::{
    Axis3D, CadError, CadResult, Feature, FeatureError, FeatureResult, SketchPlane, Solid, Wire2D,
    combine_features,
};

use super::BuildContext;

/// Overshoot of cutting tools past the faces they open.
pub const CLEARANCE: f64 = 0.5;

/// Treatment of one end of a [`Prism`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    Sharp,
    /// 45 degree chamfer shrinking the outline
    Chamfer(f64),
    /// 45 degree flare growing the outline (cutting tools)
    Flare(f64),
    /// Quarter-round shrinking the outline
    Round(f64),
}

impl Edge {
    /// `(inset, distance from the end face)` stations, starting at the face.
    fn stations(self, segments: u32) -> Vec<(f64, f64)> {
        match self {
            Edge::Chamfer(c) if c > 0.0 => vec![(c, 0.0), (0.0, c)],
            Edge::Flare(c) if c > 0.0 => vec![(-c, 0.0), (0.0, c)],
            Edge::Round(r) if r > 0.0 => {
                let steps = (segments / 4).max(2);
                (0..=steps)
                    .map(|i| {
                        let theta = FRAC_PI_2 * i as f64 / steps as f64;
                        (r * (1.0 - theta.sin()), r * (1.0 - theta.cos()))
                    })
                    .collect()
            }
            _ => vec![(0.0, 0.0)],
        }
    }
}

/// Closed outline of a [`Prism`], centred on the sketch origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    /// Corner radii ordered bottom-left, bottom-right, top-right, top-left
    RoundedRect {
        width: f64,
        height: f64,
        radii: [f64; 4],
    },
    Circle {
        radius: f64,
    },
}

impl Outline {
    pub fn rect(width: f64, height: f64) -> Self {
        Self::RoundedRect {
            width,
            height,
            radii: [0.0; 4],
        }
    }

    pub fn rounded(width: f64, height: f64, radius: f64) -> Self {
        Self::RoundedRect {
            width,
            height,
            radii: [radius; 4],
        }
    }

    pub fn circle(radius: f64) -> Self {
        Self::Circle { radius }
    }

    /// Wire of this outline offset inwards by `inset` (outwards if negative)
    fn wire(&self, center: DVec2, inset: f64, segments: u32) -> CadResult<Wire2D> {
        match *self {
            Outline::RoundedRect {
                width,
                height,
                radii,
            } => {
                let (w, h) = (width - 2.0 * inset, height - 2.0 * inset);
                if w <= 0.0 || h <= 0.0 {
                    return Err(CadError::InvalidProfile(format!(
                        "inset {inset} consumes a {width}x{height} outline"
                    )));
                }
                let radii = radii.map(|r| if r > 0.0 { (r - inset).max(0.0) } else { 0.0 });
                Ok(Wire2D::rounded_rectangle_corners(center, w, h, radii, segments))
            }
            Outline::Circle { radius } => {
                let r = radius - inset;
                if r <= 0.0 {
                    return Err(CadError::InvalidProfile(format!(
                        "inset {inset} consumes a circle of radius {radius}"
                    )));
                }
                Ok(Wire2D::circle(center, r, segments))
            }
        }
    }
}

/// Straight prism with optional chamfered, flared or rounded ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prism {
    pub outline: Outline,
    pub height: f64,
    pub bottom: Edge,
    pub top: Edge,
}

impl Prism {
    pub fn new(outline: Outline, height: f64) -> Self {
        Self {
            outline,
            height,
            bottom: Edge::Sharp,
            top: Edge::Sharp,
        }
    }

    pub fn bottom(mut self, edge: Edge) -> Self {
        self.bottom = edge;
        self
    }

    pub fn top(mut self, edge: Edge) -> Self {
        self.top = edge;
        self
    }

    /// `(height, inset)` stations from bottom to top, strictly rising.
    fn stations(&self, segments: u32) -> Vec<(f64, f64)> {
        let bottom = self
            .bottom
            .stations(segments)
            .into_iter()
            .map(|(inset, d)| (d, inset));
        let top = self
            .top
            .stations(segments)
            .into_iter()
            .rev()
            .map(|(inset, d)| (self.height - d, inset));

        let mut stations: Vec<(f64, f64)> = Vec::new();
        for (z, inset) in bottom.chain(top) {
            if stations.last().is_none_or(|&(last, _)| z > last + 1e-9) {
                stations.push((z, inset));
            }
        }
        stations
    }

    /// Build the prism rising from `plane` along its normal, centred on
    /// `center` in plane coordinates.
    pub fn build(
        &self,
        ctx: &BuildContext<'_>,
        plane: &SketchPlane,
        center: DVec2,
    ) -> CadResult<Solid> {
        if self.height <= 0.0 {
            return Err(CadError::InvalidProfile(format!(
                "prism height must be positive, got {}",
                self.height
            )));
        }
        let stations = self.stations(ctx.segments);
        if let [(z0, a), (z1, b)] = stations[..] {
            if a == b {
                let wire = self.outline.wire(center, a, ctx.segments)?;
                return ctx.kernel.extrude(&wire, &plane.offset(z0), z1 - z0);
            }
        }

        let sections = stations
            .iter()
            .map(|&(z, inset)| {
                let wire = self.outline.wire(center, inset, ctx.segments)?;
                Ok((wire, plane.offset(z)))
            })
            .collect::<CadResult<Vec<_>>>()?;
        ctx.kernel.loft(&sections)
    }
}

/// Axis-aligned block spanning the corners `min` and `max`
pub fn block(ctx: &BuildContext<'_>, min: DVec3, max: DVec3) -> CadResult<Solid> {
    ctx.kernel.create_box((min + max) / 2.0, max - min)
}

/// Cylinder on `plane` between offsets `from` and `to` along its normal
pub fn cylinder(
    ctx: &BuildContext<'_>,
    plane: &SketchPlane,
    center: DVec2,
    radius: f64,
    from: f64,
    to: f64,
) -> CadResult<Solid> {
    let circle = Wire2D::circle(center, radius, ctx.segments);
    ctx.kernel.extrude(&circle, &plane.offset(from), to - from)
}

/// Cutter for a countersunk screw hole entering `plane` against its normal.
///
/// The head recess starts [`CLEARANCE`] above the face; the shank runs
/// `depth` below it.
pub fn countersunk_hole(
    ctx: &BuildContext<'_>,
    plane: &SketchPlane,
    center: DVec2,
    diameter: f64,
    head_diameter: f64,
    angle_degrees: f64,
    depth: f64,
) -> CadResult<Solid> {
    let (r, head) = (diameter / 2.0, head_diameter / 2.0);
    let cone = ((head - r).max(0.0) / (angle_degrees.to_radians() / 2.0).tan()).min(depth * 0.5);
    let stations = [(CLEARANCE, head), (0.0, head), (-cone, r), (-depth, r)];
    let sections = stations
        .iter()
        .map(|&(z, radius)| {
            (
                Wire2D::circle(center, radius, ctx.segments),
                plane.offset(z),
            )
        })
        .collect::<Vec<_>>();
    ctx.kernel.loft(&sections)
}

/// Full revolution about the world Z axis of a `(radius, z)` profile.
pub fn revolved(ctx: &BuildContext<'_>, profile: &[(f64, f64)]) -> CadResult<Solid> {
    let wire = Wire2D::new(profile.iter().map(|&(r, z)| DVec2::new(r, z)).collect());
    ctx.kernel
        .revolve(&wire, &SketchPlane::xz(), &Axis3D::z(), TAU, ctx.segments)
}

/// One solid per pattern point, unioned into an additive feature.
///
/// Invert the result to cut the pattern instead.
pub fn patterned(
    ctx: &BuildContext<'_>,
    points: &[DVec2],
    make: impl Fn(DVec2) -> CadResult<Solid>,
) -> FeatureResult<Feature> {
    let features = points
        .iter()
        .map(|&p| make(p).map(Feature::additive))
        .collect::<CadResult<Vec<_>>>()?;
    combine_features(ctx.kernel, features)
}

/// Helical thread teeth pointing inwards from a bore of `diameter`,
/// starting at z = 0 and running `length` up the Z axis.
///
/// Added to a nut this is an internal thread; inverted, it cuts the
/// matching groove into a rod of the same diameter.
pub fn screw_thread(
    ctx: &BuildContext<'_>,
    pitch: f64,
    crest: f64,
    diameter: f64,
    length: f64,
    left_handed: bool,
) -> FeatureResult<Feature> {
    let unthreaded = pitch * 0.25;
    let extrusion = length - pitch - unthreaded;
    if extrusion <= 0.0 {
        return Err(FeatureError::InvalidGeometry(format!(
            "thread of pitch {pitch} does not fit in length {length}"
        )));
    }
    let turns = extrusion / pitch;

    let r = diameter / 2.0;
    let e = crest * 0.01;
    let tooth = Wire2D::new(vec![
        DVec2::new(r + e, pitch * 0.08),
        DVec2::new(r - crest, pitch * 0.45),
        DVec2::new(r - crest, pitch * 0.55),
        DVec2::new(r + e, pitch * 0.92),
    ]);
    let plane = SketchPlane::xz().centered_at(DVec2::new(0.0, unthreaded / 2.0));
    let twist = if left_handed { -TAU } else { TAU } * turns;
    let steps = (ctx.segments as f64 * turns).ceil().max(1.0) as u32;

    let solid = ctx
        .kernel
        .twist_extrude(&tooth, &plane, &Axis3D::z(), extrusion, twist, steps)?;
    Ok(Feature::additive(solid))
}
