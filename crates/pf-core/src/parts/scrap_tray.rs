//! Shallow tray that slides under a printer to catch purge lines and
//! supports, with a tab at one end to pull it out by.

use std::f64::consts::SQRT_2;

use glam::DVec2;
use pf_cad::{Feature, FeatureResult, SketchPlane, Wire2D, rect_array, resolve_features};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapTray {
    pub depth: f64,
    pub width: f64,
    pub length: f64,
    pub wall_thickness: f64,
    pub corner_radius: f64,
    pub bottom_chamfer: f64,
    pub handle_radius: f64,
    /// Shallow grooves across the underside to cut sliding friction
    pub n_bottom_grooves: u32,
    pub bottom_groove_depth: f64,
}

impl Default for ScrapTray {
    fn default() -> Self {
        let width = 295.0;
        Self {
            depth: 35.0,
            width,
            length: width * 0.8,
            wall_thickness: 3.0,
            corner_radius: 30.0,
            bottom_chamfer: 10.0,
            handle_radius: 15.0,
            n_bottom_grooves: 15,
            bottom_groove_depth: 0.5,
        }
    }
}

impl ScrapTray {
    fn groove_pitch(&self) -> f64 {
        let flat = self.width - 2.0 * self.bottom_chamfer.max(self.corner_radius);
        flat / self.n_bottom_grooves.max(1) as f64
    }

    /// Chamfer of the inner floor edge, keeping the wall thickness along
    /// the outer chamfer
    fn inner_chamfer(&self) -> f64 {
        (self.bottom_chamfer - self.wall_thickness * (2.0 - SQRT_2)).max(0.0)
    }

    fn outer(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let body = Prism::new(
            Outline::rounded(self.width, self.length, self.corner_radius),
            self.depth,
        )
        .bottom(Edge::Chamfer(self.bottom_chamfer))
        .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;
        Ok(Feature::additive(body))
    }

    /// Conical tab hanging off the rim at the -Y end
    fn handle(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let drop = self.handle_radius - self.wall_thickness;
        let tab = Prism::new(Outline::circle(self.handle_radius), drop)
            .bottom(Edge::Chamfer(drop))
            .build(
                ctx,
                &SketchPlane::xy().offset(self.depth - drop),
                DVec2::new(0.0, -self.length / 2.0 + self.wall_thickness),
            )?;
        Ok(Feature::additive(tab))
    }

    fn cavity(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let wall = self.wall_thickness;
        let cavity = Prism::new(
            Outline::rounded(
                self.width - 2.0 * wall,
                self.length - 2.0 * wall,
                self.corner_radius - wall,
            ),
            self.depth - wall + CLEARANCE,
        )
        .bottom(Edge::Chamfer(self.inner_chamfer()))
        .build(ctx, &SketchPlane::xy().offset(wall), DVec2::ZERO)?;
        Ok(Feature::subtractive(cavity))
    }

    fn grooves(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let pitch = self.groove_pitch();
        let points = rect_array(pitch, 1.0, self.n_bottom_grooves, 1);
        let plane = SketchPlane::xy().offset(-CLEARANCE);
        Ok(patterned(ctx, &points, |p| {
            let slot = Wire2D::slot(p, self.length, pitch * 0.5, 90.0, ctx.segments);
            ctx.kernel
                .extrude(&slot, &plane, self.bottom_groove_depth + CLEARANCE)
        })?
        .invert())
    }
}

impl PartGenerator for ScrapTray {
    fn name(&self) -> &'static str {
        "scrap_tray"
    }

    fn description(&self) -> &'static str {
        "Under-printer scrap tray with a pull tab"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let solid = resolve_features(
            ctx.kernel,
            [
                self.outer(ctx)?,
                self.handle(ctx)?,
                self.cavity(ctx)?,
                self.grooves(ctx)?,
            ],
        )?;
        Ok(vec![BuiltPart::new("scrap_tray", solid)])
    }
}
