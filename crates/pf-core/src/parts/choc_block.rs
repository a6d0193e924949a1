//! Macro keypad for low-profile switches: a case with a grid of switch
//! sockets and a base plate carrying the microcontroller board.

use glam::DVec2;
use pf_cad::{Feature, FeatureResult, SketchPlane, rect_array, resolve_features};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, block, cylinder, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChocBlock {
    pub cols: u32,
    pub rows: u32,
    pub colspace: f64,
    pub rowspace: f64,
    pub case_height: f64,
    pub margin: f64,

    pub socket_width: f64,
    pub socket_height: f64,
    /// Depth of the switch ledge below the top face
    pub socket_depth: f64,
    pub socket_rib_thickness: f64,

    pub screw_boss_diameter: f64,
    pub screw_boss_height: f64,
    pub screw_hole_diameter: f64,
    pub screw_hole_depth: f64,

    pub base_thickness: f64,
    pub base_hole_diameter: f64,
    pub base_cbore_diameter: f64,
    pub base_cbore_depth: f64,

    pub pico_length: f64,
    pub pico_width: f64,
    pub pico_hole_diameter: f64,
    pub pico_hole_sep_l: f64,
    pub pico_hole_sep_w: f64,
    pub pico_hole_peg_height: f64,

    /// Channels under the board headers for solder joints
    pub pico_header_digout_inset: f64,
    pub pico_header_digout_width: f64,
    pub pico_header_digout_depth: f64,

    /// Bars along the base edges that centre the case during assembly
    pub alignment_bar_thickness: f64,
    pub alignment_bar_clearance: f64,

    pub usb_width: f64,
    pub usb_height: f64,
    pub usb_plug_width: f64,
    pub usb_plug_height: f64,
}

impl Default for ChocBlock {
    fn default() -> Self {
        let socket_clearance = 0.0;
        Self {
            cols: 5,
            rows: 4,
            colspace: 17.5,
            rowspace: 17.5,
            case_height: 8.0,
            margin: 4.0,
            socket_width: 13.8 + socket_clearance,
            socket_height: 13.6 + socket_clearance,
            socket_depth: 1.2,
            socket_rib_thickness: 3.0,
            screw_boss_diameter: 6.0,
            screw_boss_height: 5.0,
            screw_hole_diameter: 2.8,
            screw_hole_depth: 4.5,
            base_thickness: 4.5,
            base_hole_diameter: 3.2,
            base_cbore_diameter: 5.2,
            base_cbore_depth: 3.2,
            pico_length: 51.0,
            pico_width: 21.0,
            pico_hole_diameter: 2.1,
            pico_hole_sep_l: 47.0,
            pico_hole_sep_w: 11.4,
            pico_hole_peg_height: 1.5,
            pico_header_digout_inset: 0.5,
            pico_header_digout_width: 4.0,
            pico_header_digout_depth: 1.0,
            alignment_bar_thickness: 1.5,
            alignment_bar_clearance: 0.2,
            usb_width: 8.0,
            usb_height: 3.6,
            usb_plug_width: 12.0,
            usb_plug_height: 6.0,
        }
    }
}

impl ChocBlock {
    /// Extent of the switch grid
    fn grid(&self) -> DVec2 {
        DVec2::new(
            self.cols as f64 * self.colspace,
            self.rows as f64 * self.rowspace,
        )
    }

    fn outline(&self) -> Outline {
        let size = self.grid() + 2.0 * self.margin;
        Outline::rounded(size.x, size.y, self.margin)
    }

    /// X of the case's right-hand outer face
    fn right_face(&self) -> f64 {
        self.grid().x / 2.0 + self.margin
    }

    fn screw_points(&self) -> Vec<DVec2> {
        let grid = self.grid();
        rect_array(grid.x, grid.y, 2, 2)
    }

    fn switch_points(&self) -> Vec<DVec2> {
        rect_array(self.colspace, self.rowspace, self.cols, self.rows)
    }

    fn suffix(&self) -> String {
        format!("{}x{}", self.cols, self.rows)
    }

    /// Box from `(x0, y0)` to `(x1, y1)` between heights `z0` and `z1`
    fn slab(
        ctx: &BuildContext<'_>,
        center: DVec2,
        size: DVec2,
        z0: f64,
        z1: f64,
    ) -> FeatureResult<Feature> {
        let half = size / 2.0;
        let solid = block(ctx, (center - half).extend(z0), (center + half).extend(z1))?;
        Ok(Feature::additive(solid))
    }

    /// Open-bottomed shell with a socket per switch
    fn case_shell(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let h = self.case_height;
        let ceiling = h - self.socket_rib_thickness;
        let body = Prism::new(self.outline(), h)
            .top(Edge::Chamfer(self.margin * 0.5))
            .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;

        let cavity = Self::slab(ctx, DVec2::ZERO, self.grid(), -CLEARANCE, ceiling)?;
        let socket = DVec2::new(self.socket_width, self.socket_height);
        let ledge = DVec2::new(self.colspace, self.rowspace) - 2.0;
        let points = self.switch_points();
        let sockets = points
            .iter()
            .map(|&p| Self::slab(ctx, p, socket, ceiling - CLEARANCE, h + CLEARANCE))
            .chain(
                points
                    .iter()
                    .map(|&p| Self::slab(ctx, p, ledge, ceiling - CLEARANCE, h - self.socket_depth)),
            )
            .collect::<FeatureResult<Vec<_>>>()?;

        let cuts = pf_cad::combine_features(ctx.kernel, std::iter::once(cavity).chain(sockets))?;
        let shell = Feature::additive(body)
            .combine(ctx.kernel, &cuts.invert())?
            .resolve(ctx.kernel)?;
        Ok(Feature::additive(shell))
    }

    /// Notch in the right wall for the board's USB socket, with a wider
    /// recess outside it for the plug
    fn usb_cutout(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let x = self.right_face();
        let through = Self::slab(
            ctx,
            DVec2::new(x - (self.margin + 1.0) / 2.0 + CLEARANCE / 2.0, 0.0),
            DVec2::new(self.margin + 1.0 + CLEARANCE, self.usb_width),
            -CLEARANCE,
            self.usb_height,
        )?;
        let recess = Self::slab(
            ctx,
            DVec2::new(x - (self.margin - 1.0) / 2.0 + CLEARANCE / 2.0, 0.0),
            DVec2::new(self.margin - 1.0 + CLEARANCE, self.usb_plug_width),
            -CLEARANCE,
            self.usb_plug_height,
        )?;
        Ok(through.combine(ctx.kernel, &recess)?.invert())
    }

    fn case(&self, ctx: &BuildContext<'_>) -> FeatureResult<BuiltPart> {
        let xy = SketchPlane::xy();
        let points = self.screw_points();
        let bosses = patterned(ctx, &points, |p| {
            let r = self.screw_boss_diameter / 2.0;
            cylinder(ctx, &xy, p, r, 0.0, self.screw_boss_height + CLEARANCE)
        })?;
        let holes = patterned(ctx, &points, |p| {
            let r = self.screw_hole_diameter / 2.0;
            cylinder(ctx, &xy, p, r, -CLEARANCE, self.screw_hole_depth)
        })?;

        let solid = resolve_features(
            ctx.kernel,
            [
                self.case_shell(ctx)?,
                bosses,
                holes.invert(),
                self.usb_cutout(ctx)?,
            ],
        )?;
        Ok(BuiltPart::new(format!("choc_block_case_{}", self.suffix()), solid))
    }

    /// Locating pegs, end stop and solder channels for the board
    fn pico_mount(&self, ctx: &BuildContext<'_>, top: f64) -> FeatureResult<Feature> {
        let xy = SketchPlane::xy();
        let center = DVec2::new((self.grid().x - self.pico_length) / 2.0, 0.0);
        let peg_points: Vec<DVec2> = rect_array(self.pico_hole_sep_l, self.pico_hole_sep_w, 2, 2)
            .into_iter()
            .map(|p| p + center)
            .collect();
        let pegs = patterned(ctx, &peg_points, |p| {
            let r = self.pico_hole_diameter / 2.0;
            cylinder(ctx, &xy, p, r, top - CLEARANCE, top + self.pico_hole_peg_height)
        })?;

        let bar = self.alignment_bar_thickness;
        let stop = Self::slab(
            ctx,
            DVec2::new(self.grid().x / 2.0 - self.pico_length - bar / 2.0, 0.0),
            DVec2::new(bar, self.pico_hole_sep_w),
            top - CLEARANCE,
            top + bar,
        )?;

        let digouts = rect_array(
            1.0,
            self.pico_width - 2.0 * self.pico_header_digout_inset,
            1,
            2,
        )
        .into_iter()
        .map(|p| {
            Self::slab(
                ctx,
                p + center,
                DVec2::new(self.pico_length, self.pico_header_digout_width),
                top - self.pico_header_digout_depth,
                top + CLEARANCE,
            )
        })
        .collect::<FeatureResult<Vec<_>>>()?;
        let digouts = pf_cad::combine_features(ctx.kernel, digouts)?;

        pf_cad::combine_features(ctx.kernel, [pegs, stop, digouts.invert()])
    }

    fn base(&self, ctx: &BuildContext<'_>) -> FeatureResult<BuiltPart> {
        let top = self.base_thickness;
        let body = Prism::new(self.outline(), top)
            .bottom(Edge::Chamfer(0.2 * self.margin))
            .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;

        let grid = self.grid();
        let bar = self.alignment_bar_thickness;
        let clearance = self.alignment_bar_clearance;
        let bars = rect_array(1.0, grid.y - bar - 2.0 * clearance, 1, 2)
            .into_iter()
            .map(|p| {
                Self::slab(
                    ctx,
                    p,
                    DVec2::new(grid.x - self.screw_boss_diameter - 2.0 * clearance, bar),
                    top - CLEARANCE,
                    top + bar,
                )
            })
            .collect::<FeatureResult<Vec<_>>>()?;

        // Tongue closing the bottom of the case's USB notch
        let x = self.right_face();
        let tongue = Self::slab(
            ctx,
            DVec2::new(x - self.margin / 2.0, 0.0),
            DVec2::new(self.margin, self.usb_width),
            top - CLEARANCE,
            top + 1.0,
        )?;
        let plug = Self::slab(
            ctx,
            DVec2::new(x - (self.margin - 1.0) / 2.0 + CLEARANCE / 2.0, 0.0),
            DVec2::new(self.margin - 1.0 + CLEARANCE, self.usb_plug_width),
            top - self.usb_plug_height / 2.0,
            top + self.usb_plug_height / 2.0,
        )?;

        let xy = SketchPlane::xy();
        let points = self.screw_points();
        let holes = patterned(ctx, &points, |p| {
            let r = self.base_hole_diameter / 2.0;
            cylinder(ctx, &xy, p, r, -CLEARANCE, top + CLEARANCE)
        })?;
        let counterbores = patterned(ctx, &points, |p| {
            let r = self.base_cbore_diameter / 2.0;
            cylinder(ctx, &xy, p, r, -CLEARANCE, self.base_cbore_depth)
        })?;

        let features = [Feature::additive(body), self.pico_mount(ctx, top)?, tongue]
            .into_iter()
            .chain(bars)
            .chain([plug.invert(), holes.invert(), counterbores.invert()]);
        let solid = resolve_features(ctx.kernel, features)?;
        Ok(BuiltPart::new(format!("choc_block_base_{}", self.suffix()), solid))
    }
}

impl PartGenerator for ChocBlock {
    fn name(&self) -> &'static str {
        "choc_block"
    }

    fn description(&self) -> &'static str {
        "Keypad case for low-profile switches and its base plate"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        Ok(vec![self.case(ctx)?, self.base(ctx)?])
    }
}
