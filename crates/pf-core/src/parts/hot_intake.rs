//! Hot air intake backplate with a screw-on hose fitting.
//!
//! The plate clips into the intake grille of a portable air conditioner;
//! the fitting screws into the plate's hose hole and carries the thread for
//! a 150mm hose.

use std::f64::consts::PI;

use glam::{DVec2, DVec3};
use pf_cad::{
    Axis3D, Feature, FeatureResult, SketchPlane, Wire2D, polar_array, rect_array,
    resolve_features,
};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, cylinder, patterned, revolved, screw_thread};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotIntake {
    pub plate_width: f64,
    pub plate_height: f64,
    pub plate_corner_radius: f64,
    pub plate_edge_chamfer: f64,
    pub plate_wall_thickness: f64,
    pub plate_wall_height: f64,
    pub plate_bottom_thickness: f64,

    /// Locking tabs on the bottom edge
    pub tab_width: f64,
    pub tab_length: f64,
    pub tab_thickness: f64,
    pub tab_pitch: f64,
    pub tab_count: u32,

    /// Snap-fits on the top edge
    pub top_snap_width: f64,
    pub top_snap_side_relief: f64,
    pub top_snap_thickness: f64,
    pub top_snap_inset: f64,
    pub top_snap_freeboard: f64,
    pub top_snap_lip_step: f64,
    pub top_snap_lip_height: f64,
    pub top_snap_pitch: f64,
    pub top_snap_count: u32,
    pub side_snap_width: f64,

    pub hose_hole_diameter: f64,
    pub hose_groove_depth: f64,
    pub hose_screw_count: u32,
    pub hose_screw_loose: f64,
    pub hose_screw_tight: f64,
    pub hose_screw_cb_depth: f64,
    pub hose_screw_cb_diameter: f64,

    /// Magnets holding a filter plate inside the backplate
    pub magnet_hole_diameter: f64,
    pub magnet_hole_depth: f64,
    pub magnet_hole_edge_inset: f64,

    pub fitting_thread_pitch: f64,
    pub fitting_thread_crest: f64,
    pub fitting_left_handed: bool,
}

impl Default for HotIntake {
    fn default() -> Self {
        Self {
            plate_width: 255.0,
            plate_height: 249.0,
            plate_corner_radius: 6.0,
            plate_edge_chamfer: 2.0,
            plate_wall_thickness: 4.0,
            plate_wall_height: 8.0,
            plate_bottom_thickness: 5.0,
            tab_width: 10.0,
            tab_length: 4.0,
            tab_thickness: 2.1,
            tab_pitch: 98.0,
            tab_count: 3,
            top_snap_width: 10.0,
            top_snap_side_relief: 2.1,
            top_snap_thickness: 1.5,
            top_snap_inset: 1.0,
            top_snap_freeboard: 2.4,
            top_snap_lip_step: 1.6,
            top_snap_lip_height: 3.5,
            top_snap_pitch: 160.0,
            top_snap_count: 2,
            side_snap_width: 6.8,
            hose_hole_diameter: 150.0,
            hose_groove_depth: 2.0,
            hose_screw_count: 6,
            hose_screw_loose: 3.7,
            hose_screw_tight: 3.1,
            hose_screw_cb_depth: 3.1,
            hose_screw_cb_diameter: 5.5,
            magnet_hole_diameter: 6.5,
            magnet_hole_depth: 3.2,
            magnet_hole_edge_inset: 10.0,
            fitting_thread_pitch: 8.0,
            fitting_thread_crest: 5.0,
            fitting_left_handed: false,
        }
    }
}

impl HotIntake {
    fn plate_depth(&self) -> f64 {
        self.plate_bottom_thickness + self.plate_wall_height
    }

    fn hose_groove_diameter(&self) -> f64 {
        self.hose_hole_diameter + 10.0
    }

    fn hose_screw_ring(&self) -> f64 {
        self.hose_hole_diameter + 20.0
    }

    pub fn fitting_diameter(&self) -> f64 {
        self.hose_screw_ring() + 10.0
    }

    pub fn fitting_length(&self) -> f64 {
        self.fitting_thread_pitch * 3.5
    }

    /// Plate with the filter pocket hollowed out of its underside
    fn plate_base(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let outer = Outline::rounded(self.plate_width, self.plate_height, self.plate_corner_radius);
        let positive = Prism::new(outer, self.plate_depth())
            .top(Edge::Chamfer(self.plate_edge_chamfer))
            .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;

        let wall = self.plate_wall_thickness;
        let inner = Outline::rounded(
            self.plate_width - 2.0 * wall,
            self.plate_height - 2.0 * wall,
            (self.plate_corner_radius - wall).max(0.0),
        );
        let negative = Prism::new(inner, self.plate_wall_height + CLEARANCE)
            .top(Edge::Chamfer(self.plate_edge_chamfer))
            .build(ctx, &SketchPlane::xy().offset(-CLEARANCE), DVec2::ZERO)?;

        Ok(Feature::new(Some(positive), Some(negative)))
    }

    fn tabs(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let round = self.tab_length / 4.0;
        // Tabs reach into the wall so they fuse with it
        let outline = Outline::RoundedRect {
            width: self.tab_width,
            height: self.tab_length + CLEARANCE,
            radii: [round, round, 0.0, 0.0],
        };
        let y = -(self.plate_height + self.tab_length - CLEARANCE) / 2.0;
        let points = rect_array(self.tab_pitch, 1.0, self.tab_count, 1);
        patterned(ctx, &points, |p| {
            Prism::new(outline, self.tab_thickness).build(
                ctx,
                &SketchPlane::xy(),
                p + DVec2::new(0.0, y),
            )
        })
    }

    /// Cantilevered hooks hanging from the plate's floor next to the wall at
    /// `centre_to_wall`, with relief slots cut around them.
    ///
    /// Built against the +Y wall, then turned `angle` degrees about Z.
    fn snap_fits(
        &self,
        ctx: &BuildContext<'_>,
        width: f64,
        pitch: f64,
        count: u32,
        centre_to_wall: f64,
        angle: f64,
    ) -> FeatureResult<Feature> {
        let t = self.top_snap_thickness;
        let y1 = centre_to_wall - self.top_snap_inset;
        let y0 = y1 - t;
        let lip = y1 + self.top_snap_lip_step;
        let z_lip = -self.top_snap_freeboard;
        let z_bottom = z_lip - self.top_snap_lip_height;
        let z_chamfer = (z_bottom + t + self.top_snap_lip_step).min(z_lip);
        let z_top = self.plate_wall_height + CLEARANCE;

        // Side profile in the YZ plane: column with an outward chamfered lip
        let hook = Wire2D::new(vec![
            DVec2::new(y0, z_bottom),
            DVec2::new(lip, z_chamfer),
            DVec2::new(lip, z_lip),
            DVec2::new(y1, z_lip),
            DVec2::new(y1, z_top),
            DVec2::new(y0, z_top),
        ]);
        let points = rect_array(pitch, 1.0, count, 1);

        let columns = patterned(ctx, &points, |p| {
            let plane = SketchPlane::yz().offset(p.x - width / 2.0);
            ctx.kernel.extrude(&hook, &plane, width)
        })?
        .resolve(ctx.kernel)?;

        let relief = Outline::rect(
            width + 2.0 * self.top_snap_side_relief,
            t + 3.0 * self.plate_wall_thickness,
        );
        let slots = patterned(ctx, &points, |p| {
            Prism::new(relief, self.plate_wall_height + CLEARANCE).build(
                ctx,
                &SketchPlane::xy().offset(-CLEARANCE),
                DVec2::new(p.x, (y0 + y1) / 2.0),
            )
        })?
        .resolve(ctx.kernel)?;
        let slots = Feature::new(Some(slots), Some(columns.clone())).resolve(ctx.kernel)?;

        Feature::new(Some(columns), Some(slots)).rotate(ctx.kernel, DVec3::Z, angle)
    }

    /// Hose hole with a chamfered mouth and counterbored screw holes
    fn hose_cutout(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let depth = self.plate_depth();
        let hole = (self.hose_hole_diameter - self.fitting_thread_crest) / 2.0;
        let bore = Prism::new(Outline::circle(hole), depth + 2.0 * CLEARANCE)
            .top(Edge::Flare(self.plate_edge_chamfer + CLEARANCE))
            .build(ctx, &SketchPlane::xy().offset(-CLEARANCE), DVec2::ZERO)?;

        let xy = SketchPlane::xy();
        let ring = polar_array(self.hose_screw_ring() / 2.0, 0.0, 360.0, self.hose_screw_count);
        let floor = self.plate_wall_height - CLEARANCE;
        let screws = patterned(ctx, &ring, |p| {
            cylinder(ctx, &xy, p, self.hose_screw_loose / 2.0, floor, depth + CLEARANCE)
        })?;
        let counterbores = patterned(ctx, &ring, |p| {
            let top = self.plate_wall_height + self.hose_screw_cb_depth;
            cylinder(ctx, &xy, p, self.hose_screw_cb_diameter / 2.0, floor, top)
        })?;

        Ok(Feature::additive(bore)
            .combine(ctx.kernel, &screws)?
            .combine(ctx.kernel, &counterbores)?
            .invert())
    }

    /// V-groove ring sunk below z = 0 that locates the fitting
    fn hose_interlock_groove(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let r = self.hose_groove_diameter() / 2.0;
        let d = self.hose_groove_depth;
        let groove = revolved(
            ctx,
            &[(r - d - CLEARANCE, CLEARANCE), (r, -d), (r + d + CLEARANCE, CLEARANCE)],
        )?;
        Ok(Feature::subtractive(groove))
    }

    fn magnet_holes(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let inset = 2.0 * self.magnet_hole_edge_inset;
        let points = rect_array(
            (self.plate_width - inset) / 2.0,
            (self.plate_height - inset) / 2.0,
            3,
            3,
        );
        Ok(patterned(ctx, &points, |p| {
            let r = self.magnet_hole_diameter / 2.0;
            cylinder(ctx, &SketchPlane::xy(), p, r, -CLEARANCE, self.magnet_hole_depth)
        })?
        .invert())
    }

    fn plate(&self, ctx: &BuildContext<'_>) -> FeatureResult<BuiltPart> {
        let kernel = ctx.kernel;
        let half_width = self.plate_width / 2.0;
        let plate = resolve_features(
            kernel,
            [
                self.plate_base(ctx)?,
                self.tabs(ctx)?,
                self.hose_cutout(ctx)?,
                self.hose_interlock_groove(ctx)?
                    .translate_z(kernel, self.plate_depth())?,
                self.snap_fits(
                    ctx,
                    self.top_snap_width,
                    self.top_snap_pitch,
                    self.top_snap_count,
                    self.plate_height / 2.0,
                    0.0,
                )?,
                self.snap_fits(ctx, self.side_snap_width, 1.0, 1, half_width, 90.0)?,
                self.snap_fits(ctx, self.side_snap_width, 1.0, 1, half_width, -90.0)?,
                self.magnet_holes(ctx)?
                    .translate_z(kernel, self.plate_wall_height)?,
            ],
        )?;

        // Print with the pocket facing up
        let plate = kernel.rotate(&plate, &Axis3D::x(), PI)?;
        Ok(BuiltPart::new("hot_intake_plate", plate))
    }

    /// Ring with a flat top and chamfered bottom, bored to the hose diameter
    fn fitting_base(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let outer = self.fitting_diameter() / 2.0;
        let inner = self.hose_hole_diameter / 2.0;
        let length = self.fitting_length();
        let ring = outer - inner;
        let bottom = length.min(ring * 0.7);
        let top = ring * 0.1;

        let body = revolved(
            ctx,
            &[
                (inner, 0.0),
                (outer - bottom, 0.0),
                (outer, bottom),
                (outer, length - top),
                (outer - top, length),
                (inner + top, length),
                (inner, length - top),
            ],
        )?;
        let bore_chamfer = revolved(
            ctx,
            &[
                (inner - CLEARANCE, -CLEARANCE),
                (inner + top + CLEARANCE, -CLEARANCE),
                (inner - CLEARANCE, top + CLEARANCE),
            ],
        )?;
        Ok(Feature::new(Some(body), Some(bore_chamfer)))
    }

    fn fitting_screw_holes(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let length = self.fitting_length();
        let ring = polar_array(self.hose_screw_ring() / 2.0, 0.0, 360.0, self.hose_screw_count);
        Ok(patterned(ctx, &ring, |p| {
            let r = self.hose_screw_tight / 2.0;
            cylinder(ctx, &SketchPlane::xy(), p, r, length * 0.5, length + CLEARANCE)
        })?
        .invert())
    }

    fn fitting(&self, ctx: &BuildContext<'_>) -> FeatureResult<BuiltPart> {
        let kernel = ctx.kernel;
        // The plate's groove, flipped onto the fitting's top face as a ridge
        let ridge = self
            .hose_interlock_groove(ctx)?
            .rotate(kernel, DVec3::X, 180.0)?
            .translate_z(kernel, self.fitting_length())?
            .invert();
        let thread = screw_thread(
            ctx,
            self.fitting_thread_pitch,
            self.fitting_thread_crest,
            self.hose_hole_diameter,
            self.fitting_length(),
            self.fitting_left_handed,
        )?;

        let fitting = resolve_features(
            kernel,
            [self.fitting_base(ctx)?, ridge, self.fitting_screw_holes(ctx)?, thread],
        )?;
        Ok(BuiltPart::new("hot_intake_fitting", fitting))
    }
}

impl PartGenerator for HotIntake {
    fn name(&self) -> &'static str {
        "hot_intake"
    }

    fn description(&self) -> &'static str {
        "Air conditioner intake backplate and threaded hose fitting"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        Ok(vec![self.plate(ctx)?, self.fitting(ctx)?])
    }
}
