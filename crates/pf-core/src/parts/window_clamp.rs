//! C-shaped clamps holding a window panel against the frame, plus the
//! backing plate they screw into.

use std::f64::consts::FRAC_1_SQRT_2;

use glam::{DVec2, DVec3};
use pf_cad::{
    CadResult, Feature, FeatureError, FeatureResult, SketchPlane, Wire2D, combine_features,
    rect_array, resolve_features,
};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, cylinder, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowClamp {
    /// Back-side reach (X)
    pub l1: f64,
    /// Jaw gap (Y)
    pub l2: f64,
    /// Diagonal run, roughly 45 degrees
    pub l3: f64,
    /// Front-side reach (X); one clamp is generated per entry
    pub l4_options: Vec<f64>,
    pub l3_angle_hack: f64,

    pub seal_step: f64,
    pub seal_step_from_end: f64,

    /// Wall thickness, ideally four extrusion lines
    pub thickness: f64,
    pub height: f64,

    pub screw_loose: f64,
    pub screw_tight: f64,
    pub screw_block_height: f64,
    pub screw_count: u32,
    pub screw_cb_depth: f64,
    pub screw_cb_diameter: f64,
}

impl Default for WindowClamp {
    fn default() -> Self {
        Self {
            l1: 25.0,
            l2: 6.0,
            l3: 22.0,
            l4_options: vec![17.0, 43.0],
            l3_angle_hack: 3.0,
            seal_step: 3.5,
            seal_step_from_end: 9.0,
            thickness: 2.0,
            height: 30.0,
            screw_loose: 3.7,
            screw_tight: 3.1,
            screw_block_height: 3.5,
            screw_count: 2,
            screw_cb_depth: 3.1,
            screw_cb_diameter: 5.5,
        }
    }
}

impl WindowClamp {
    fn screw_block_width(&self) -> f64 {
        self.screw_tight + 2.5
    }

    fn screw_spacing(&self) -> f64 {
        self.height / 2.0
    }

    /// Screw positions in XZ plane coordinates
    fn screw_points(&self) -> Vec<DVec2> {
        let center = DVec2::new(self.screw_block_width() / 2.0, self.height / 2.0);
        rect_array(1.0, self.screw_spacing(), 1, self.screw_count)
            .into_iter()
            .map(|p| p + center)
            .collect()
    }

    /// Centre line of the clip, as a polyline starting at the origin
    pub fn clip_path(&self, l4: f64) -> Vec<DVec2> {
        let diagonal = self.l3 * FRAC_1_SQRT_2;
        let deltas = [
            DVec2::new(l4 - self.thickness / 2.0, 0.0),
            DVec2::new(diagonal, diagonal - self.l3_angle_hack),
            DVec2::new(0.0, self.l2 + self.thickness + self.l3_angle_hack),
            DVec2::new(
                -self.l1 + self.thickness / 2.0 + self.seal_step + self.seal_step_from_end,
                0.0,
            ),
            DVec2::new(-self.seal_step, -self.seal_step),
            DVec2::new(-self.seal_step_from_end, 0.0),
        ];
        std::iter::once(DVec2::ZERO)
            .chain(deltas.iter().scan(DVec2::ZERO, |at, d| {
                *at += *d;
                Some(*at)
            }))
            .collect()
    }

    /// The clip path thickened by half the wall on each side
    fn c_clip(&self, ctx: &BuildContext<'_>, l4: f64) -> FeatureResult<Feature> {
        let path = self.clip_path(l4);
        let strokes = path
            .windows(2)
            .map(|seg| {
                let wire = Wire2D::stadium(seg[0], seg[1], self.thickness, ctx.segments);
                let solid = ctx.kernel.extrude(&wire, &SketchPlane::xy(), self.height)?;
                Ok(Feature::additive(solid))
            })
            .collect::<CadResult<Vec<_>>>()?;
        combine_features(ctx.kernel, strokes)?.translate_x(ctx.kernel, self.thickness / 2.0)
    }

    fn screw_block(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let width = self.screw_block_width();
        let outline = Outline::rounded(
            width,
            self.screw_block_height + self.thickness,
            self.thickness / 2.0,
        );
        let center = DVec2::new(width / 2.0, -self.screw_block_height / 2.0);
        let block = Prism::new(outline, self.height).build(ctx, &SketchPlane::xy(), center)?;
        Ok(Feature::additive(block))
    }

    /// Tapped holes running through the screw block along Y
    fn clip_screw_holes(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let from = -self.thickness / 2.0 - CLEARANCE;
        let to = self.screw_block_height + self.thickness / 2.0 + CLEARANCE;
        Ok(patterned(ctx, &self.screw_points(), |p| {
            cylinder(ctx, &SketchPlane::xz(), p, self.screw_tight / 2.0, from, to)
        })?
        .invert())
    }

    fn clip(&self, ctx: &BuildContext<'_>, l4: f64) -> FeatureResult<BuiltPart> {
        let solid = resolve_features(
            ctx.kernel,
            [
                self.c_clip(ctx, l4)?,
                self.screw_block(ctx)?,
                self.clip_screw_holes(ctx)?,
            ],
        )?;
        Ok(BuiltPart::new(format!("window_clamp_{l4}"), solid))
    }

    /// Backing plate as wide as the shortest clamp, with counterbored holes
    fn plate(&self, ctx: &BuildContext<'_>) -> FeatureResult<BuiltPart> {
        let width = self
            .l4_options
            .iter()
            .copied()
            .reduce(f64::min)
            .ok_or_else(|| FeatureError::InvalidGeometry("no clamp lengths configured".into()))?;
        let depth = 1.2 + self.screw_cb_depth;
        let xz = SketchPlane::xz();

        let round = self.thickness / 2.0;
        let body = Prism::new(Outline::rounded(width, self.height, round), depth)
            .top(Edge::Round(round))
            .build(ctx, &xz, DVec2::new(width / 2.0, self.height / 2.0))?;

        let points = self.screw_points();
        let holes = patterned(ctx, &points, |p| {
            cylinder(ctx, &xz, p, self.screw_loose / 2.0, -CLEARANCE, depth + CLEARANCE)
        })?;
        let counterbores = patterned(ctx, &points, |p| {
            let r = self.screw_cb_diameter / 2.0;
            cylinder(ctx, &xz, p, r, depth - self.screw_cb_depth, depth + CLEARANCE)
        })?;

        // Stand the plate on its counterbored face for printing
        let solid = combine_features(
            ctx.kernel,
            [Feature::additive(body), holes.invert(), counterbores.invert()],
        )?
        .rotate(ctx.kernel, DVec3::X, -90.0)?
        .resolve(ctx.kernel)?;
        Ok(BuiltPart::new("window_clamp_plate", solid))
    }
}

impl PartGenerator for WindowClamp {
    fn name(&self) -> &'static str {
        "window_clamp"
    }

    fn description(&self) -> &'static str {
        "Window panel clamps in several reaches and their backing plate"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let mut parts = self
            .l4_options
            .iter()
            .map(|&l4| self.clip(ctx, l4))
            .collect::<FeatureResult<Vec<_>>>()?;
        parts.push(self.plate(ctx)?);
        Ok(parts)
    }
}
