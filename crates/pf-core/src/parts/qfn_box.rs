//! Two-part storage box for QFN chip packages, held shut by magnets.
//!
//! The base carries a grid of shallow pockets, one per package, with the
//! walls between them notched so a package can be levered out. The lid
//! clears the pocket walls and presses each package down with a peg.

use glam::{DVec2, DVec3};
use pf_cad::{Feature, FeatureResult, SketchPlane, rect_array, resolve_features};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, block, cylinder, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QfnBox {
    pub package_size: f64,
    pub package_thickness: f64,
    pub cols: u32,
    pub rows: u32,

    pub package_clearance: f64,
    pub package_spacing: f64,
    pub package_lip_height: f64,
    pub package_lip_chamfer: f64,
    /// Width of the wall notches as a fraction of the package size
    pub package_wall_cutout_fraction: f64,

    pub box_margin: f64,
    pub box_fillet: f64,
    pub box_bottom_chamfer: f64,
    pub box_top_chamfer: f64,
    pub box_finger_cutout_inset_fraction: f64,
    pub box_finger_cutout_widening_fraction: f64,
    pub box_finger_cutout_depth_fraction: f64,
    pub box_depth: f64,
    pub lid_clearance: f64,

    pub magnet_diameter: f64,
    pub magnet_thickness: f64,
    pub magnet_edge_inset: f64,
    /// Plastic left over each magnet
    pub magnet_bury_depth: f64,
}

impl Default for QfnBox {
    fn default() -> Self {
        Self {
            package_size: 10.0,
            package_thickness: 0.8,
            cols: 4,
            rows: 4,
            package_clearance: 0.3,
            package_spacing: 4.0,
            package_lip_height: 1.0,
            package_lip_chamfer: 1.2,
            package_wall_cutout_fraction: 0.5,
            box_margin: 10.0,
            box_fillet: 5.0,
            box_bottom_chamfer: 1.5,
            box_top_chamfer: 0.6,
            box_finger_cutout_inset_fraction: 0.6,
            box_finger_cutout_widening_fraction: 1.0,
            box_finger_cutout_depth_fraction: 0.5,
            box_depth: 7.5,
            lid_clearance: 0.2,
            magnet_diameter: 6.0 + 0.35,
            magnet_thickness: 3.0 + 0.2,
            magnet_edge_inset: 1.5,
            magnet_bury_depth: 0.4,
        }
    }
}

impl QfnBox {
    fn package_pitch(&self) -> f64 {
        self.package_size + self.package_spacing
    }

    fn wall_height(&self) -> f64 {
        self.package_thickness + self.package_lip_height
    }

    fn box_size(&self) -> DVec2 {
        DVec2::new(self.cols as f64, self.rows as f64) * self.package_pitch()
            + 2.0 * self.box_margin
    }

    /// Footprint of the pocket grid including its outer walls
    fn grid_size(&self) -> DVec2 {
        DVec2::new(self.cols as f64, self.rows as f64) * self.package_pitch()
            + self.package_spacing
    }

    fn package_points(&self) -> Vec<DVec2> {
        let pitch = self.package_pitch();
        rect_array(pitch, pitch, self.cols, self.rows)
    }

    fn stem(&self) -> String {
        format!("qfn_box_{}mm_{}x{}", self.package_size, self.cols, self.rows)
    }

    fn block_outline(&self) -> Outline {
        let size = self.box_size();
        Outline::rounded(size.x, size.y, self.box_fillet)
    }

    /// Half-round notches in the middle of each side for prising the box
    /// open, cut `depth` in from the face at `face_z` in direction `dir`
    fn finger_cutouts(
        &self,
        ctx: &BuildContext<'_>,
        face_z: f64,
        dir: f64,
    ) -> FeatureResult<Feature> {
        let widening = 2.0 * self.box_margin * self.box_finger_cutout_widening_fraction;
        let size = self.box_size() + widening;
        let radius = self.box_margin
            * (self.box_finger_cutout_widening_fraction + self.box_finger_cutout_inset_fraction);
        let depth = self.box_depth * self.box_finger_cutout_depth_fraction;
        let mut points = rect_array(size.x, size.y, 2, 1);
        points.extend(rect_array(size.x, size.y, 1, 2));

        let xy = SketchPlane::xy();
        let (from, to) = ordered(face_z - dir * CLEARANCE, face_z + dir * depth);
        Ok(patterned(ctx, &points, |p| cylinder(ctx, &xy, p, radius, from, to))?.invert())
    }

    /// Magnet pockets buried `magnet_bury_depth` under the face at `face_z`
    fn magnet_holes(
        &self,
        ctx: &BuildContext<'_>,
        face_z: f64,
        dir: f64,
    ) -> FeatureResult<Feature> {
        let spacing = self.box_size() - self.magnet_diameter - 2.0 * self.magnet_edge_inset;
        let points = rect_array(spacing.x, spacing.y, 2, 2);
        let top = face_z + dir * self.magnet_bury_depth;
        let (from, to) = ordered(top, top + dir * self.magnet_thickness);
        let xy = SketchPlane::xy();
        let r = self.magnet_diameter / 2.0;
        Ok(patterned(ctx, &points, |p| cylinder(ctx, &xy, p, r, from, to))?.invert())
    }

    /// Raised pocket walls standing on the base's top face at `floor`.
    ///
    /// The walls are cut on their own and reach [`CLEARANCE`] into the base,
    /// so the pocket floors are the base's top face.
    fn pocket_walls(&self, ctx: &BuildContext<'_>, floor: f64) -> FeatureResult<Feature> {
        let grid = self.grid_size();
        let height = self.wall_height();
        let top = floor + height;
        let xy = SketchPlane::xy();

        let walls = Prism::new(Outline::rect(grid.x, grid.y), height + CLEARANCE)
            .top(Edge::Chamfer(self.package_lip_chamfer))
            .build(ctx, &xy.offset(floor - CLEARANCE), DVec2::ZERO)?;

        let size = self.package_size + 2.0 * self.package_clearance;
        let below = floor - 2.0 * CLEARANCE;
        let pockets = patterned(ctx, &self.package_points(), |p| {
            Prism::new(Outline::rect(size, size), top + CLEARANCE - below)
                .top(Edge::Flare(self.package_lip_chamfer + CLEARANCE))
                .build(ctx, &xy.offset(below), p)
        })?;

        let pitch = self.package_pitch();
        let notch = self.package_size * self.package_wall_cutout_fraction;
        let (cols, rows) = (self.cols, self.rows);
        let notches = [
            (rect_array(pitch, pitch, cols, 1), DVec3::new(notch, grid.y, 0.0)),
            (rect_array(pitch, pitch, 1, rows), DVec3::new(grid.x, notch, 0.0)),
        ]
        .into_iter()
        .map(|(points, size)| {
            let half = size / 2.0 + DVec3::new(CLEARANCE, CLEARANCE, 0.0);
            patterned(ctx, &points, |p| {
                block(ctx, p.extend(below) - half, p.extend(top + CLEARANCE) + half)
            })
        })
        .collect::<FeatureResult<Vec<_>>>()?;

        let cut = resolve_features(
            ctx.kernel,
            [
                Feature::additive(walls),
                pockets.invert(),
                notches[0].invert(),
                notches[1].invert(),
            ],
        )?;
        Ok(Feature::additive(cut))
    }

    fn base(&self, ctx: &BuildContext<'_>) -> FeatureResult<BuiltPart> {
        let top = self.box_depth;
        let body = Prism::new(self.block_outline(), top)
            .bottom(Edge::Chamfer(self.box_bottom_chamfer))
            .top(Edge::Chamfer(self.box_top_chamfer))
            .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;

        let solid = resolve_features(
            ctx.kernel,
            [
                Feature::additive(body),
                self.finger_cutouts(ctx, top, -1.0)?,
                self.magnet_holes(ctx, top, -1.0)?,
                self.pocket_walls(ctx, top)?,
            ],
        )?;
        Ok(BuiltPart::new(format!("{}_base", self.stem()), solid))
    }

    /// Lid built upside down: its mating face is z = 0
    fn lid(&self, ctx: &BuildContext<'_>) -> FeatureResult<BuiltPart> {
        let body = Prism::new(self.block_outline(), self.box_depth)
            .bottom(Edge::Chamfer(self.box_top_chamfer))
            .top(Edge::Chamfer(self.box_bottom_chamfer))
            .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;

        let recess_size = self.grid_size() + 2.0 * self.lid_clearance;
        let depth = self.wall_height();
        let recess = block(
            ctx,
            DVec3::new(-recess_size.x / 2.0, -recess_size.y / 2.0, -CLEARANCE),
            DVec3::new(recess_size.x / 2.0, recess_size.y / 2.0, depth),
        )?;

        let shell = resolve_features(
            ctx.kernel,
            [
                Feature::additive(body),
                self.finger_cutouts(ctx, 0.0, 1.0)?,
                self.magnet_holes(ctx, 0.0, 1.0)?,
                Feature::subtractive(recess),
            ],
        )?;

        // Pegs hang from the recess ceiling, one over each package
        let xy = SketchPlane::xy();
        let r = self.package_size * 0.8 / 2.0;
        let pegs = patterned(ctx, &self.package_points(), |p| {
            cylinder(ctx, &xy, p, r, depth - self.package_lip_height, depth + CLEARANCE)
        })?;
        let solid = Feature::additive(shell)
            .combine(ctx.kernel, &pegs)?
            .resolve(ctx.kernel)?;
        Ok(BuiltPart::new(format!("{}_lid", self.stem()), solid))
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    (a.min(b), a.max(b))
}

impl PartGenerator for QfnBox {
    fn name(&self) -> &'static str {
        "qfn_box"
    }

    fn description(&self) -> &'static str {
        "Magnetic box with a pocket grid for QFN packages"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        Ok(vec![self.base(ctx)?, self.lid(ctx)?])
    }
}
