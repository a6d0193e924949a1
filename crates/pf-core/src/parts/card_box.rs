//! Block holding a row of square cards in slanted slots, with a trough
//! along the top for reaching under them.

use glam::{DVec2, DVec3};
use pf_cad::{Feature, FeatureResult, SketchPlane, Wire2D, rect_array, resolve_features};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, cylinder, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardBox {
    pub card_size: f64,
    pub card_clearance: f64,
    pub card_thickness: f64,
    pub card_spacing: f64,
    pub n_cards: u32,
    /// Slot angle from the base, in degrees
    pub card_angle: f64,
    /// Wall left at each end of the slots
    pub card_edge_inset: f64,

    pub corner_fillet: f64,
    pub bottom_chamfer: f64,
    pub top_fillet: f64,
}

impl Default for CardBox {
    fn default() -> Self {
        Self {
            card_size: 46.0,
            card_clearance: 0.5,
            card_thickness: 3.0,
            card_spacing: 10.0,
            n_cards: 10,
            card_angle: 60.0,
            card_edge_inset: 5.0,
            corner_fillet: 6.0,
            bottom_chamfer: 3.0,
            top_fillet: 3.0,
        }
    }
}

impl CardBox {
    fn card_wh(&self) -> f64 {
        self.card_size + 2.0 * self.card_clearance
    }

    fn base_width(&self) -> f64 {
        self.card_wh() + 2.0 * self.card_edge_inset
    }

    fn base_length(&self) -> f64 {
        0.4 * self.card_wh() + self.card_spacing * self.n_cards.saturating_sub(1) as f64 + 10.0
    }

    fn base_height(&self) -> f64 {
        self.card_wh() * 0.5
    }

    fn body(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let body = Prism::new(
            Outline::rounded(self.base_width(), self.base_length(), self.corner_fillet),
            self.base_height(),
        )
        .bottom(Edge::Chamfer(self.bottom_chamfer))
        .top(Edge::Round(self.top_fillet))
        .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;
        Ok(Feature::additive(body))
    }

    /// Half-round channel along the top, running the full length
    fn trough(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let half = self.base_length() / 2.0 + CLEARANCE;
        let trough = cylinder(
            ctx,
            &SketchPlane::xz(),
            DVec2::new(0.0, self.base_height()),
            self.card_wh() / 4.0,
            -half,
            half,
        )?;
        Ok(Feature::subtractive(trough))
    }

    /// Slanted card slots entering from the top, stopping short of the ends
    fn slots(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let wh = self.card_wh();
        // Looking along +X: local X is world -Y and local Y is world Z
        let plane = SketchPlane::new(
            DVec3::new(
                self.card_edge_inset - self.base_width() / 2.0,
                0.0,
                self.base_height() / 2.0 + 0.25 * wh,
            ),
            DVec3::NEG_X,
            DVec3::NEG_Y,
        );
        let points = rect_array(self.card_spacing, 1.0, self.n_cards, 1);
        Ok(patterned(ctx, &points, |p| {
            let slot = Wire2D::slot(p, wh, self.card_thickness, self.card_angle, ctx.segments);
            ctx.kernel.extrude(&slot, &plane, -wh)
        })?
        .invert())
    }
}

impl PartGenerator for CardBox {
    fn name(&self) -> &'static str {
        "card_box"
    }

    fn description(&self) -> &'static str {
        "Card holder with slanted slots"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let solid = resolve_features(
            ctx.kernel,
            [self.body(ctx)?, self.trough(ctx)?, self.slots(ctx)?],
        )?;
        Ok(vec![BuiltPart::new("card_box", solid)])
    }
}
