//! Two-piece hose fitting that screws through a hole in a window panel.
//!
//! The inner piece carries an external thread and magnet pockets for a
//! clip-on collar; the outer piece is the matching nut.

use pf_cad::{Feature, FeatureResult, SketchPlane, polar_array, resolve_features};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, cylinder, patterned, revolved, screw_thread};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowFitting {
    /// Hole in the panel, less clearance
    pub plate_hole_diameter: f64,
    pub plate_thickness: f64,

    pub thread_pitch: f64,
    pub thread_crest: f64,
    pub thread_clearance: f64,
    pub face_chamfer: f64,
    pub fit_chamfer: f64,

    pub flange_thickness: f64,
    pub flange_width: f64,

    pub magnet_diameter: f64,
    pub magnet_depth: f64,
    pub magnet_count: u32,

    pub grip_groove_count: u32,
    pub grip_groove_depth: f64,
}

impl Default for WindowFitting {
    fn default() -> Self {
        Self {
            plate_hole_diameter: 148.0,
            plate_thickness: 4.0,
            thread_pitch: 3.2,
            thread_crest: 1.6,
            thread_clearance: 0.8,
            face_chamfer: 3.5,
            fit_chamfer: 1.0,
            flange_thickness: 8.0,
            flange_width: 12.0,
            magnet_diameter: 6.6,
            magnet_depth: 3.2,
            magnet_count: 8,
            grip_groove_count: 24,
            grip_groove_depth: 0.8,
        }
    }
}

impl WindowFitting {
    fn inner_diameter(&self) -> f64 {
        self.plate_hole_diameter - 8.0
    }

    fn flange_radius(&self) -> f64 {
        self.flange_width + self.plate_hole_diameter / 2.0
    }

    pub fn magnet_ring_diameter(&self) -> f64 {
        (self.plate_hole_diameter + self.inner_diameter()) / 2.0 + self.flange_width
    }

    /// Scallops around the flange rim
    fn grip_grooves(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let groove = self.grip_groove_depth * 10.0;
        let ring = polar_array(
            self.flange_radius() + groove - self.grip_groove_depth,
            0.0,
            360.0,
            self.grip_groove_count,
        );
        let top = self.flange_thickness + CLEARANCE;
        Ok(patterned(ctx, &ring, |p| {
            cylinder(ctx, &SketchPlane::xy(), p, groove, -CLEARANCE, top)
        })?
        .invert())
    }

    /// Flange with a tube that passes through the panel
    fn inner_base(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let flange = self.flange_radius();
        let tube = self.plate_hole_diameter / 2.0;
        let bore = self.inner_diameter() / 2.0;
        let height = self.flange_thickness * 2.0 + self.plate_thickness;
        let (face, fit) = (self.face_chamfer, self.fit_chamfer);

        let body = revolved(
            ctx,
            &[
                (bore + face, 0.0),
                (flange - face, 0.0),
                (flange, face),
                (flange, self.flange_thickness),
                (tube, self.flange_thickness),
                (tube, height - fit),
                (tube - fit, height),
                (bore + fit, height),
                (bore, height - fit),
                (bore, face),
            ],
        )?;
        Feature::additive(body).combine(ctx.kernel, &self.grip_grooves(ctx)?)
    }

    fn outer_base(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let flange = self.flange_radius();
        let bore = self.plate_hole_diameter / 2.0 + self.thread_clearance;
        let height = self.flange_thickness;
        let (face, fit) = (self.face_chamfer, self.fit_chamfer);

        let body = revolved(
            ctx,
            &[
                (bore, 0.0),
                (flange - face, 0.0),
                (flange, face),
                (flange, height - fit),
                (flange - fit, height),
                (bore, height),
            ],
        )?;
        Feature::additive(body).combine(ctx.kernel, &self.grip_grooves(ctx)?)
    }

    fn magnet_holes(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let ring = polar_array(self.magnet_ring_diameter() / 2.0, 0.0, 360.0, self.magnet_count);
        Ok(patterned(ctx, &ring, |p| {
            let r = self.magnet_diameter / 2.0;
            cylinder(ctx, &SketchPlane::xy(), p, r, -CLEARANCE, self.magnet_depth)
        })?
        .invert())
    }

    fn inner(&self, ctx: &BuildContext<'_>) -> FeatureResult<BuiltPart> {
        let kernel = ctx.kernel;
        let groove = screw_thread(
            ctx,
            self.thread_pitch,
            self.thread_crest,
            self.plate_hole_diameter,
            self.plate_thickness + self.flange_thickness + self.thread_pitch,
            false,
        )?
        .translate_z(kernel, self.flange_thickness)?
        .invert();

        let solid = resolve_features(
            kernel,
            [self.inner_base(ctx)?, groove, self.magnet_holes(ctx)?],
        )?;
        Ok(BuiltPart::new("window_fitting_inner", solid))
    }

    fn outer(&self, ctx: &BuildContext<'_>) -> FeatureResult<BuiltPart> {
        let thread = screw_thread(
            ctx,
            self.thread_pitch,
            self.thread_crest,
            self.plate_hole_diameter + 2.0 * self.thread_clearance,
            self.flange_thickness,
            false,
        )?;
        let solid = resolve_features(ctx.kernel, [self.outer_base(ctx)?, thread])?;
        Ok(BuiltPart::new("window_fitting_outer", solid))
    }
}

impl PartGenerator for WindowFitting {
    fn name(&self) -> &'static str {
        "window_fitting"
    }

    fn description(&self) -> &'static str {
        "Threaded two-piece hose fitting for a window panel"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        Ok(vec![self.inner(ctx)?, self.outer(ctx)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pf_cad::{CadKernel, MeshKernel};

    #[test]
    fn test_magnet_ring() {
        assert_relative_eq!(WindowFitting::default().magnet_ring_diameter(), 156.0);
    }

    #[test]
    fn test_outer_nut_bounds() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let part = WindowFitting::default().outer(&ctx).unwrap();
        assert_eq!(part.name, "window_fitting_outer");

        let (min, max) = kernel.tessellate(&part.solid).unwrap().bounds().unwrap();
        assert_relative_eq!(min[2], 0.0, epsilon = 1e-4);
        assert_relative_eq!(max[2], 8.0, epsilon = 1e-4);
        assert!(max[0] <= 86.0 + 1e-4);
        assert!(max[0] > 80.0);
    }
}
