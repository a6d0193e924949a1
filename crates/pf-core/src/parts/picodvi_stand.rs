//! Reclined stand for a small display in its casing, with clearance for
//! the ribbon cable at top and bottom.

use glam::{DVec2, DVec3};
use pf_cad::{Feature, FeatureResult, SketchPlane, Wire2D, rect_array, resolve_features};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PicodviStand {
    pub fit_tolerance: f64,
    pub casing_width: f64,
    pub casing_height: f64,
    pub casing_thickness: f64,

    pub ribbon_width: f64,
    pub ribbon_clearance: f64,

    /// Lean of the display from vertical, in degrees
    pub recline_from_vertical: f64,

    pub base_thickness: f64,
    pub base_column_width: f64,
    pub base_column_height: f64,
    pub base_length: f64,
    pub base_chamfer: f64,
    /// Overlap of each column onto the casing's side edge
    pub lip: f64,
}

impl Default for PicodviStand {
    fn default() -> Self {
        let fit_tolerance = 0.3;
        Self {
            fit_tolerance,
            casing_width: 165.0 + fit_tolerance,
            casing_height: 100.0 + fit_tolerance,
            casing_thickness: 3.7 + fit_tolerance,
            ribbon_width: 35.0,
            ribbon_clearance: 1.5,
            recline_from_vertical: 30.0,
            base_thickness: 10.0,
            base_column_width: 10.0,
            base_column_height: 30.0,
            base_length: 65.0,
            base_chamfer: 3.0,
            lip: 2.0,
        }
    }
}

impl PicodviStand {
    fn base_width(&self) -> f64 {
        self.casing_width + 2.0 * self.base_column_width
    }

    /// Plane of the casing's back face, with its bottom edge resting on
    /// the base
    fn casing_plane(&self) -> SketchPlane {
        let recline = self.recline_from_vertical.to_radians();
        let tilt = std::f64::consts::FRAC_PI_2 - recline;
        SketchPlane::new(
            DVec3::new(
                0.0,
                0.0,
                self.casing_height / 2.0 * recline.cos() + self.base_thickness,
            ),
            DVec3::new(0.0, -tilt.sin(), tilt.cos()),
            DVec3::X,
        )
    }

    fn base(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let xy = SketchPlane::xy();
        let chamfer = Edge::Chamfer(self.base_chamfer);
        let plate = Prism::new(
            Outline::rect(self.base_width(), self.base_length),
            self.base_thickness,
        )
        .bottom(chamfer)
        .top(chamfer)
        .build(ctx, &xy, DVec2::ZERO)?;

        let spacing = self.casing_width + self.base_column_width - self.lip;
        let points = rect_array(spacing, 1.0, 2, 1);
        let columns = patterned(ctx, &points, |p| {
            Prism::new(
                Outline::rect(self.base_column_width + self.lip, self.base_length),
                self.base_thickness + self.base_column_height,
            )
            .bottom(chamfer)
            .top(chamfer)
            .build(ctx, &xy, p)
        })?;
        Feature::additive(plate).combine(ctx.kernel, &columns)
    }

    /// Opening through the base behind the display, for its cables
    fn cutout(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let depth = self.base_length * 2.0 / 3.0;
        let flare = Edge::Flare(self.base_chamfer + CLEARANCE);
        let cutout = Prism::new(
            Outline::rect(self.casing_width - 2.0 * self.base_column_width, 2.0 * depth),
            self.base_thickness + 2.0 * CLEARANCE,
        )
        .bottom(flare)
        .top(flare)
        .build(
            ctx,
            &SketchPlane::xy().offset(-CLEARANCE),
            DVec2::new(0.0, self.base_length / 2.0),
        )?;
        Ok(Feature::subtractive(cutout))
    }

    /// The reclined casing, with ribbon reliefs at its top and bottom edges
    fn casing(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let plane = self.casing_plane();
        let t = self.casing_thickness;
        let slab = ctx.kernel.extrude(
            &Wire2D::rectangle(DVec2::ZERO, self.casing_width, self.casing_height),
            &plane,
            t,
        )?;
        let points = rect_array(1.0, self.casing_height, 1, 2);
        let reliefs = patterned(ctx, &points, |p| {
            let relief = Wire2D::rectangle(p, self.ribbon_width, self.ribbon_clearance);
            ctx.kernel.extrude(&relief, &plane, t)
        })?;
        Feature::additive(slab).combine(ctx.kernel, &reliefs)
    }
}

impl PartGenerator for PicodviStand {
    fn name(&self) -> &'static str {
        "picodvi_stand"
    }

    fn description(&self) -> &'static str {
        "Reclined display stand"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let solid = resolve_features(
            ctx.kernel,
            [
                self.base(ctx)?,
                self.cutout(ctx)?,
                self.casing(ctx)?.invert(),
            ],
        )?;
        Ok(vec![BuiltPart::new("picodvi_stand", solid)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pf_cad::MeshKernel;

    #[test]
    fn test_casing_rests_on_base() {
        let params = PicodviStand::default();
        let plane = params.casing_plane();
        let bottom = plane.to_world(DVec2::new(0.0, -params.casing_height / 2.0));
        let top = plane.to_world(DVec2::new(0.0, params.casing_height / 2.0));
        assert_relative_eq!(bottom.z, 10.0, epsilon = 1e-9);
        // Leans back by the recline angle
        let lean = (top.y - bottom.y).atan2(top.z - bottom.z).to_degrees();
        assert_relative_eq!(lean, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_columns_hold_casing_edges() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let params = PicodviStand::default();
        let casing = params.casing(&ctx).unwrap();
        let (min, max) = kernel.bounds(casing.positive().unwrap()).unwrap();
        // The casing's sides run 2mm into each column
        assert_relative_eq!(max.x, 82.65, epsilon = 1e-9);
        assert_relative_eq!(min.x, -82.65, epsilon = 1e-9);
        let column_inner = (params.casing_width + params.base_column_width - params.lip) / 2.0
            - (params.base_column_width + params.lip) / 2.0;
        assert_relative_eq!(max.x - column_inner, params.lip, epsilon = 1e-9);
    }

    #[test]
    fn test_stand_bounds() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let parts = PicodviStand::default().build(&ctx).unwrap();
        assert_eq!(parts[0].name, "picodvi_stand");

        let (min, max) = kernel.bounds(&parts[0].solid).unwrap();
        assert_relative_eq!(min.x, -92.65, epsilon = 1e-9);
        assert_relative_eq!(max.y, 32.5, epsilon = 1e-9);
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 40.0, epsilon = 1e-9);
    }
}
