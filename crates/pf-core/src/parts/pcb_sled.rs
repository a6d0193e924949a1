//! Carrier plate for a circuit board on four standoffs, with a cutout for
//! reaching a module on its underside.

use glam::DVec2;
use pf_cad::{Feature, FeatureResult, SketchPlane, rect_array, resolve_features};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, cylinder, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcbSled {
    pub perimeter_w: f64,
    pub perimeter_h: f64,
    /// Mounting hole pattern of the board
    pub holes_w: f64,
    pub holes_h: f64,

    pub corner_fillet: f64,
    pub edge_chamfer: f64,

    /// Sized for threading an M2 screw directly
    pub hole_diameter: f64,
    pub boss_diameter: f64,

    pub thickness: f64,
    pub standoff: f64,

    pub cutout_offset_from_left: f64,
    pub cutout_w: f64,
    pub cutout_l: f64,
    pub cutout_fillet: f64,
    pub cutout_inset: f64,
}

impl Default for PcbSled {
    fn default() -> Self {
        Self {
            perimeter_w: 100.0,
            perimeter_h: 65.0,
            holes_w: 94.0,
            holes_h: 59.0,
            corner_fillet: 3.0,
            edge_chamfer: 1.5,
            hole_diameter: 1.8,
            boss_diameter: 6.0,
            thickness: 3.0,
            standoff: 3.0,
            cutout_offset_from_left: 36.0,
            cutout_w: 28.0,
            cutout_l: 43.0,
            cutout_fillet: 2.0,
            cutout_inset: 15.0,
        }
    }
}

impl PcbSled {
    pub fn part_name(&self) -> String {
        format!("pcb_sled_W{}_H{}", self.perimeter_w, self.perimeter_h)
    }

    fn plate(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let plate = Prism::new(
            Outline::rounded(self.perimeter_w, self.perimeter_h, self.corner_fillet),
            self.thickness,
        )
        .bottom(Edge::Chamfer(self.edge_chamfer))
        .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;
        Ok(Feature::additive(plate))
    }

    /// Standoffs with screw holes starting inside the plate
    fn bosses(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let xy = SketchPlane::xy();
        let points = rect_array(self.holes_w, self.holes_h, 2, 2);
        let top = self.thickness + self.standoff;

        let bosses = patterned(ctx, &points, |p| {
            let r = self.boss_diameter / 2.0;
            cylinder(ctx, &xy, p, r, self.thickness - CLEARANCE, top)
        })?;
        let holes = patterned(ctx, &points, |p| {
            let r = self.hole_diameter / 2.0;
            cylinder(ctx, &xy, p, r, self.edge_chamfer, top + CLEARANCE)
        })?;
        bosses.combine(ctx.kernel, &holes.invert())
    }

    /// Window through the plate, chamfered on the underside
    fn cutout(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let length = self.cutout_l - self.cutout_inset;
        let corner = DVec2::new(
            self.cutout_offset_from_left - self.perimeter_w / 2.0,
            self.cutout_inset - self.perimeter_h / 2.0,
        );
        let center = corner + DVec2::new(self.cutout_w, length) / 2.0;

        let window = Prism::new(
            Outline::rounded(self.cutout_w, length, self.cutout_fillet),
            self.thickness + 2.0 * CLEARANCE,
        )
        .bottom(Edge::Flare(self.edge_chamfer + CLEARANCE))
        .build(ctx, &SketchPlane::xy().offset(-CLEARANCE), center)?;
        Ok(Feature::subtractive(window))
    }
}

impl PartGenerator for PcbSled {
    fn name(&self) -> &'static str {
        "pcb_sled"
    }

    fn description(&self) -> &'static str {
        "Circuit board carrier with standoffs"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let solid = resolve_features(
            ctx.kernel,
            [self.plate(ctx)?, self.bosses(ctx)?, self.cutout(ctx)?],
        )?;
        Ok(vec![BuiltPart::new(self.part_name(), solid)])
    }
}
