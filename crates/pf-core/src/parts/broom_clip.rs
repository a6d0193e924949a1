//! Wall plate with a snap-in bracket for a broom handle.

use glam::{DVec2, DVec3};
use pf_cad::{Feature, FeatureResult, SketchPlane, rect_array, resolve_features};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, countersunk_hole, cylinder, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroomClip {
    pub handle_diameter: f64,
    pub screw_thread_diameter: f64,
    pub screw_head_diameter: f64,

    pub handle_clearance: f64,
    pub screw_clearance: f64,

    pub plate_width: f64,
    pub plate_height: f64,
    pub plate_thickness: f64,
    pub plate_corner_fillet: f64,

    pub bracket_height: f64,
    pub bracket_thickness: f64,
    /// How far past the handle centre the bracket wraps
    pub bracket_extra_grip_depth: f64,
}

impl Default for BroomClip {
    fn default() -> Self {
        Self {
            handle_diameter: 21.6,
            screw_thread_diameter: 3.5,
            screw_head_diameter: 6.6,
            handle_clearance: 0.5,
            screw_clearance: 0.2,
            plate_width: 45.0,
            plate_height: 25.0,
            plate_thickness: 3.0,
            plate_corner_fillet: 5.0,
            bracket_height: 20.0,
            bracket_thickness: 3.0,
            bracket_extra_grip_depth: 5.0,
        }
    }
}

impl BroomClip {
    fn bore_radius(&self) -> f64 {
        (self.handle_diameter + self.handle_clearance) / 2.0
    }

    /// Height of the handle axis above the back of the plate
    fn handle_axis(&self) -> f64 {
        self.bore_radius() + self.plate_thickness
    }

    fn plate(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let body = Prism::new(
            Outline::rounded(self.plate_width, self.plate_height, self.plate_corner_fillet),
            self.plate_thickness,
        )
        .top(Edge::Chamfer(self.plate_corner_fillet / 4.0))
        .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;

        let face = SketchPlane::xy().offset(self.plate_thickness);
        let spacing = self.plate_width - 10.0;
        let holes = patterned(ctx, &rect_array(spacing, 1.0, 2, 1), |p| {
            countersunk_hole(
                ctx,
                &face,
                p,
                self.screw_thread_diameter + self.screw_clearance,
                self.screw_head_diameter + self.screw_clearance,
                82.0,
                self.plate_thickness + CLEARANCE,
            )
        })?;
        Feature::additive(body).combine(ctx.kernel, &holes.invert())
    }

    /// Open ring around the handle, cut off above the grip line
    fn bracket(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let kernel = ctx.kernel;
        let half = self.bracket_height / 2.0;
        // Local Y on the top plane is world -Z
        let axis = DVec2::new(0.0, -self.handle_axis());
        let top = SketchPlane::top();

        let ring = cylinder(
            ctx,
            &top,
            axis,
            self.bore_radius() + self.bracket_thickness,
            -half,
            half,
        )?;
        let bore = cylinder(
            ctx,
            &top,
            axis,
            self.bore_radius(),
            -half - CLEARANCE,
            half + CLEARANCE,
        )?;

        let grip = self.handle_axis() + self.bracket_extra_grip_depth;
        let reach = self.bore_radius() + self.bracket_thickness;
        let opening = kernel.create_box(
            DVec3::new(0.0, 0.0, grip + reach),
            DVec3::new(
                2.0 * (reach + CLEARANCE),
                self.bracket_height + 2.0 * CLEARANCE,
                2.0 * reach,
            ),
        )?;

        // The bore must not reach into the plate, so the bracket is
        // resolved on its own before joining
        let bracket = resolve_features(
            kernel,
            [
                Feature::additive(ring),
                Feature::subtractive(bore),
                Feature::subtractive(opening),
            ],
        )?;
        Ok(Feature::additive(bracket))
    }
}

impl PartGenerator for BroomClip {
    fn name(&self) -> &'static str {
        "broom_clip"
    }

    fn description(&self) -> &'static str {
        "Wall mounted clip for a broom handle"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let solid = resolve_features(ctx.kernel, [self.plate(ctx)?, self.bracket(ctx)?])?;
        Ok(vec![BuiltPart::new("broom_clip", solid)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pf_cad::MeshKernel;

    #[test]
    fn test_handle_axis() {
        assert_relative_eq!(BroomClip::default().handle_axis(), 14.05, epsilon = 1e-12);
    }

    #[test]
    fn test_bracket_is_cut_at_grip_line() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let bracket = BroomClip::default().bracket(&ctx).unwrap();
        assert!(bracket.negative().is_none());

        let (min, max) = kernel.bounds(bracket.positive().unwrap()).unwrap();
        assert_relative_eq!(max.z, 19.05, epsilon = 1e-9);
        assert_relative_eq!(min.y, -10.0, epsilon = 1e-9);
        assert_relative_eq!(max.y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clip_bounds() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let parts = BroomClip::default().build(&ctx).unwrap();
        assert_eq!(parts[0].name, "broom_clip");

        let (min, max) = kernel.bounds(&parts[0].solid).unwrap();
        assert_relative_eq!(min.x, -22.5, epsilon = 1e-9);
        assert_relative_eq!(max.y, 12.5, epsilon = 1e-9);
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 19.05, epsilon = 1e-9);
    }
}
