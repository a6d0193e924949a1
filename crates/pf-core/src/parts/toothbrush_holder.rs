//! Block with a row of stepped holes for toothbrushes and a tube of paste.

use glam::{DVec2, DVec3};
use pf_cad::{
    Feature, FeatureError, FeatureResult, SketchPlane, combine_features, resolve_features,
};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, cylinder};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToothbrushHolder {
    /// One hole per entry, left to right
    pub hole_diameters: Vec<f64>,
    pub wall_thickness: f64,
    pub base_thickness: f64,
    pub height: f64,
}

impl Default for ToothbrushHolder {
    fn default() -> Self {
        Self {
            hole_diameters: vec![20.0, 40.0, 20.0],
            wall_thickness: 6.0,
            base_thickness: 5.0,
            height: 60.0,
        }
    }
}

impl ToothbrushHolder {
    fn edge_chamfer(&self) -> f64 {
        self.wall_thickness * 0.4
    }

    fn largest_hole(&self) -> FeatureResult<f64> {
        self.hole_diameters
            .iter()
            .copied()
            .reduce(f64::max)
            .ok_or_else(|| FeatureError::InvalidGeometry("no holes configured".into()))
    }

    pub fn width(&self) -> f64 {
        self.hole_diameters.iter().sum::<f64>()
            + self.wall_thickness * (self.hole_diameters.len() + 1) as f64
    }

    fn depth(&self) -> FeatureResult<f64> {
        Ok(self.largest_hole()? + self.wall_thickness * 2.0)
    }

    /// Hole centres on the XY plane, each separated by one wall
    pub fn hole_centers(&self) -> FeatureResult<Vec<DVec2>> {
        let y = self.wall_thickness + self.largest_hole()? / 2.0;
        let mut x = 0.0;
        Ok(self
            .hole_diameters
            .iter()
            .map(|d| {
                x += self.wall_thickness + d / 2.0;
                let center = DVec2::new(x, y);
                x += d / 2.0;
                center
            })
            .collect())
    }

    /// Block with its back corners rounded off
    fn base(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let (width, depth) = (self.width(), self.depth()?);
        let back = self.largest_hole()? / 2.0 + self.wall_thickness;
        let outline = Outline::RoundedRect {
            width,
            height: depth,
            radii: [0.0, 0.0, back, back],
        };
        let chamfer = Edge::Chamfer(self.edge_chamfer());
        let body = Prism::new(outline, self.height + self.base_thickness)
            .bottom(chamfer)
            .top(chamfer)
            .build(ctx, &SketchPlane::xy(), DVec2::new(width / 2.0, depth / 2.0))?;
        Ok(Feature::additive(body))
    }

    /// Blind holes from the open face, each with a drain hole through the base
    fn holes(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let plane = SketchPlane::xy();
        let chamfer = self.edge_chamfer();
        let top = self.height + self.base_thickness;

        let mut features = Vec::with_capacity(self.hole_diameters.len() * 2);
        for (&d, center) in self.hole_diameters.iter().zip(self.hole_centers()?) {
            let pocket = Prism::new(Outline::circle(d / 2.0), self.height + CLEARANCE)
                .bottom(Edge::Flare(chamfer + CLEARANCE))
                .build(ctx, &plane.offset(-CLEARANCE), center)?;
            let drain = cylinder(ctx, &plane, center, d / 4.0, -CLEARANCE, top + CLEARANCE)?;
            features.push(Feature::additive(pocket));
            features.push(Feature::additive(drain));
        }
        Ok(combine_features(ctx.kernel, features)?.invert())
    }
}

impl PartGenerator for ToothbrushHolder {
    fn name(&self) -> &'static str {
        "toothbrush_holder"
    }

    fn description(&self) -> &'static str {
        "Toothbrush and toothpaste stand"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let kernel = ctx.kernel;
        // Printed upside down, standing on the closed end
        let solid = resolve_features(kernel, [self.base(ctx)?, self.holes(ctx)?])?;
        let flipped = Feature::additive(solid)
            .rotate(kernel, DVec3::X, 180.0)?
            .translate_z(kernel, self.height + self.base_thickness)?
            .resolve(kernel)?;
        Ok(vec![BuiltPart::new("toothbrush_holder", flipped)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pf_cad::MeshKernel;

    #[test]
    fn test_layout() {
        let holder = ToothbrushHolder::default();
        assert_relative_eq!(holder.width(), 104.0);
        assert_relative_eq!(holder.depth().unwrap(), 52.0);

        let centers = holder.hole_centers().unwrap();
        let xs: Vec<f64> = centers.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![16.0, 52.0, 88.0]);
        assert!(centers.iter().all(|c| c.y == 26.0));
    }

    #[test]
    fn test_no_holes_is_invalid() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let holder = ToothbrushHolder {
            hole_diameters: Vec::new(),
            ..ToothbrushHolder::default()
        };
        assert!(matches!(
            holder.build(&ctx),
            Err(FeatureError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_holder_is_flipped_onto_the_bed() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let parts = ToothbrushHolder::default().build(&ctx).unwrap();
        assert_eq!(parts[0].name, "toothbrush_holder");

        let (min, max) = kernel.bounds(&parts[0].solid).unwrap();
        assert_relative_eq!(min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.x, 104.0, epsilon = 1e-9);
        assert_relative_eq!(min.y, -52.0, epsilon = 1e-9);
        assert_relative_eq!(max.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 65.0, epsilon = 1e-9);
    }
}
