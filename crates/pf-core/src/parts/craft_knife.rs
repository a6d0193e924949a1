//! Knife handle printed over a trapezoid snap-off blade.
//!
//! The blade cavity is left in the handle at mid height; printing pauses
//! there so the blade can be dropped in and covered.

use glam::DVec2;
use pf_cad::{Feature, FeatureResult, SketchPlane, Wire2D, rect_array, resolve_features};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, block, cylinder, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftKnife {
    pub handle_thickness: f64,
    pub handle_depth: f64,
    pub handle_length: f64,
    pub handle_end_fillet: f64,
    pub handle_chamfer: f64,

    pub handle_groove_count: u32,
    pub handle_groove_depth: f64,

    /// Height of the blade's back edge above the handle's bottom edge
    pub blade_to_bottom_edge: f64,
    pub exposed_blade_length: f64,
    pub blade_print_clearance: f64,

    pub blade_thickness: f64,
    pub blade_depth: f64,
    pub blade_bottom_length: f64,
    pub blade_slot_separation: f64,
    pub blade_slot_width: f64,
    pub blade_slot_depth: f64,
}

impl Default for CraftKnife {
    fn default() -> Self {
        let clearance = 0.65;
        Self {
            handle_thickness: 20.0,
            handle_depth: 30.0,
            handle_length: 95.0,
            handle_end_fillet: 10.0,
            handle_chamfer: 5.0,
            handle_groove_count: 4,
            handle_groove_depth: 3.0,
            blade_to_bottom_edge: 8.0,
            exposed_blade_length: 6.0,
            blade_print_clearance: clearance,
            blade_thickness: 0.6,
            blade_depth: 19.0 + clearance,
            blade_bottom_length: 61.5 + clearance,
            blade_slot_separation: 3.0 + clearance,
            blade_slot_width: 3.3 - clearance,
            blade_slot_depth: 2.5,
        }
    }
}

impl CraftKnife {
    fn blade_top_length(&self) -> f64 {
        2.0 * 11.5
            + 2.0 * self.blade_slot_width
            + self.blade_slot_separation
            + self.blade_print_clearance
    }

    /// Blade outline in handle coordinates
    fn blade_outline(&self) -> Wire2D {
        let origin = DVec2::new(-self.exposed_blade_length, self.blade_to_bottom_edge);
        let (bottom, depth) = (self.blade_bottom_length, self.blade_depth);
        let inset = (bottom - self.blade_top_length()) / 2.0;
        Wire2D::new(
            [
                DVec2::new(0.0, 0.0),
                DVec2::new(inset, depth),
                DVec2::new(bottom - inset, depth),
                DVec2::new(bottom, 0.0),
            ]
            .into_iter()
            .map(|p| p + origin)
            .collect(),
        )
    }

    /// Centres of the round ends of the two notches in the blade's back
    fn notch_points(&self) -> Vec<DVec2> {
        let center = DVec2::new(
            self.blade_bottom_length / 2.0 - self.exposed_blade_length,
            self.blade_to_bottom_edge + self.blade_depth - self.blade_slot_depth,
        );
        rect_array(self.blade_slot_separation + self.blade_slot_width, 1.0, 2, 1)
            .into_iter()
            .map(|p| p + center)
            .collect()
    }

    fn handle(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let fillet = self.handle_end_fillet;
        // The chamfered corner at the blade's heel is rounded instead
        let outline = Outline::RoundedRect {
            width: self.handle_length,
            height: self.handle_depth,
            radii: [self.handle_chamfer, fillet, fillet, fillet],
        };
        let center = DVec2::new(self.handle_length, self.handle_depth) / 2.0;
        let body = Prism::new(outline, self.handle_thickness)
            .bottom(Edge::Chamfer(self.handle_chamfer))
            .top(Edge::Chamfer(self.handle_chamfer))
            .build(ctx, &SketchPlane::xy(), center)?;
        Ok(Feature::additive(body))
    }

    /// Finger grooves scalloped into the bottom edge
    fn grooves(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let count = self.handle_groove_count.max(1);
        let spacing = self.handle_length / count as f64;
        let radius = self.handle_length / 8.0;
        let center = DVec2::new(self.handle_length / 2.0, self.handle_groove_depth - radius);
        let points: Vec<DVec2> = rect_array(spacing, 1.0, count, 1)
            .into_iter()
            .map(|p| p + center)
            .collect();
        Ok(patterned(ctx, &points, |p| {
            cylinder(
                ctx,
                &SketchPlane::xy(),
                p,
                radius,
                -CLEARANCE,
                self.handle_thickness + CLEARANCE,
            )
        })?
        .invert())
    }

    /// The blade with its notches removed, centred on the handle's mid
    /// plane
    fn blade(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let (t, mid) = (self.blade_thickness, self.handle_thickness / 2.0);
        let plate = ctx
            .kernel
            .extrude(&self.blade_outline(), &SketchPlane::xy().offset(mid - t / 2.0), t)?;

        let points = self.notch_points();
        let (w, top) = (self.blade_slot_width, self.blade_to_bottom_edge + self.blade_depth);
        let notches = patterned(ctx, &points, |p| {
            block(
                ctx,
                DVec2::new(p.x - w / 2.0, p.y).extend(mid - t),
                DVec2::new(p.x + w / 2.0, top + CLEARANCE).extend(mid + t),
            )
        })?;
        let rounds = patterned(ctx, &points, |p| {
            cylinder(ctx, &SketchPlane::xy(), p, w / 2.0, mid - t, mid + t)
        })?;

        let blade = resolve_features(
            ctx.kernel,
            [Feature::additive(plate), notches.invert(), rounds.invert()],
        )?;
        Ok(Feature::additive(blade))
    }
}

impl PartGenerator for CraftKnife {
    fn name(&self) -> &'static str {
        "craft_knife"
    }

    fn description(&self) -> &'static str {
        "Handle printed over a snap-off blade"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let blade = self.blade(ctx)?;
        let solid = resolve_features(
            ctx.kernel,
            [self.handle(ctx)?, self.grooves(ctx)?, blade.invert()],
        )?;
        Ok(vec![BuiltPart::new("craft_knife", solid)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pf_cad::MeshKernel;

    #[test]
    fn test_blade_shape() {
        let params = CraftKnife::default();
        assert_relative_eq!(params.blade_top_length(), 32.6, epsilon = 1e-9);
        // Trapezoid of parallel sides 62.15 and 32.6, 19.65 deep
        let area = (62.15 + 32.6) / 2.0 * 19.65;
        assert_relative_eq!(params.blade_outline().signed_area().abs(), area, epsilon = 1e-9);

        let points = params.notch_points();
        assert_relative_eq!(points[0].x, 31.075 - 6.0 - 3.15, epsilon = 1e-9);
        assert_relative_eq!(points[1].y, 8.0 + 17.15, epsilon = 1e-9);
    }

    #[test]
    fn test_blade_sits_mid_handle() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let blade = CraftKnife::default().blade(&ctx).unwrap();
        let (min, max) = kernel.bounds(blade.positive().unwrap()).unwrap();
        // Protrudes from the handle's end by the exposed length
        assert_relative_eq!(min.x, -6.0, epsilon = 1e-9);
        assert_relative_eq!(min.y, 8.0, epsilon = 1e-9);
        assert_relative_eq!(min.z, 9.7, epsilon = 1e-9);
        assert_relative_eq!(max.z, 10.3, epsilon = 1e-9);
    }

    #[test]
    fn test_knife_bounds() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let parts = CraftKnife::default().build(&ctx).unwrap();
        assert_eq!(parts[0].name, "craft_knife");

        let (min, max) = kernel.bounds(&parts[0].solid).unwrap();
        assert_relative_eq!(min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.x, 95.0, epsilon = 1e-9);
        assert_relative_eq!(min.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.y, 30.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 20.0, epsilon = 1e-9);
    }
}
