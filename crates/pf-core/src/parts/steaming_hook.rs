//! Block screwed to the top of a door frame with a conical notch for a
//! coat hanger hook.

use glam::DVec2;
use pf_cad::{Feature, FeatureResult, SketchPlane, rect_array, resolve_features};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, countersunk_hole, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteamingHook {
    pub csk_diameter: f64,
    pub thread_diameter: f64,

    pub block_depth: f64,
    pub block_width: f64,
    pub block_height: f64,

    pub cone_depth: f64,
    pub cone_inset: f64,
}

impl Default for SteamingHook {
    fn default() -> Self {
        Self {
            csk_diameter: 7.8,
            thread_diameter: 4.2 + 0.2,
            block_depth: 18.0,
            block_width: 40.0,
            block_height: 20.0,
            cone_depth: 15.0,
            cone_inset: 5.0,
        }
    }
}

impl SteamingHook {
    fn edge_fillet(&self) -> f64 {
        self.block_depth.min(self.block_width).min(self.block_height) * 0.2
    }

    /// Rounded block with two countersunk screw holes in its top face
    fn block(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let fillet = self.edge_fillet();
        let body = Prism::new(
            Outline::rounded(self.block_width, self.block_height, fillet),
            self.block_depth,
        )
        .top(Edge::Round(fillet))
        .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;

        let face = SketchPlane::xy().offset(self.block_depth);
        let spacing = self.block_width - 1.5 * self.csk_diameter;
        let holes = patterned(ctx, &rect_array(spacing, 1.0, 2, 1), |p| {
            countersunk_hole(
                ctx,
                &face,
                p,
                self.thread_diameter,
                self.csk_diameter,
                90.0,
                self.block_depth + CLEARANCE,
            )
        })?;
        Feature::additive(body).combine(ctx.kernel, &holes.invert())
    }

    /// Cone opening towards +Y, its tip buried in the block
    fn cone(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let r = self.block_height;
        let plane = SketchPlane::top().offset(self.block_height / 2.0 - self.cone_depth);
        let cone = Prism::new(Outline::circle(r), r)
            .bottom(Edge::Chamfer(r * 0.999))
            .build(ctx, &plane, DVec2::new(0.0, -self.cone_inset))?;
        Ok(Feature::subtractive(cone))
    }
}

impl PartGenerator for SteamingHook {
    fn name(&self) -> &'static str {
        "steaming_hook"
    }

    fn description(&self) -> &'static str {
        "Door frame hook for hanging a shirt while steaming"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let solid = resolve_features(ctx.kernel, [self.block(ctx)?, self.cone(ctx)?])?;
        Ok(vec![BuiltPart::new("steaming_hook", solid)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pf_cad::MeshKernel;

    #[test]
    fn test_cone_axis_runs_along_y() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let cone = SteamingHook::default().cone(&ctx).unwrap();
        let (min, max) = kernel.bounds(cone.negative().unwrap()).unwrap();
        assert_relative_eq!(min.y, -5.0, epsilon = 1e-9);
        assert_relative_eq!(max.y, 15.0, epsilon = 1e-9);
        assert_relative_eq!((min.z + max.z) / 2.0, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hook_keeps_block_footprint() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let parts = SteamingHook::default().build(&ctx).unwrap();
        assert_eq!(parts.len(), 1);

        let (min, max) = kernel.bounds(&parts[0].solid).unwrap();
        assert_relative_eq!(min.x, -20.0, epsilon = 1e-9);
        assert_relative_eq!(max.x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(min.y, -10.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 18.0, epsilon = 1e-9);
    }
}
