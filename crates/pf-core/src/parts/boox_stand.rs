//! Desk stands holding an e-reader upright by its bottom edge.
//!
//! Three revisions share the slot for the reader: the first sits the
//! columns on a chamfered base, the second runs rounded columns through a
//! rounded bar, and the last adds feet and lightening cutouts to a taller
//! bar.

use glam::{DVec2, DVec3};
use pf_cad::{
    CadResult, Feature, FeatureResult, SketchPlane, Wire2D, combine_features, rect_array,
};
use serde::{Deserialize, Serialize};

use super::common::{CLEARANCE, Edge, Outline, Prism, block, patterned};
use super::{BuildContext, BuiltPart, PartGenerator};

/// Measurements of the reader held by the stand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reader {
    pub width: f64,
    pub edge_thickness: f64,
    /// Distance from the right edge to the page button centre
    pub button_centre_inset: f64,
    pub button_cutout_width: f64,
    /// Recess depth as a fraction of the edge thickness
    pub button_cutout_depth_frac: f64,
    pub button_height: f64,
}

impl Default for Reader {
    fn default() -> Self {
        Self {
            width: 135.8,
            edge_thickness: 6.5,
            button_centre_inset: 22.0,
            button_cutout_width: 20.0,
            button_cutout_depth_frac: 0.8,
            button_height: 2.0,
        }
    }
}

impl Reader {
    /// Slot for the reader standing on `floor`, with a recess below it for
    /// the page button
    fn blank(&self, ctx: &BuildContext<'_>, floor: f64, height: f64) -> FeatureResult<Feature> {
        let (hw, ht) = (self.width / 2.0, self.edge_thickness / 2.0);
        let slot = block(
            ctx,
            DVec3::new(-hw, -ht, floor),
            DVec3::new(hw, ht, floor + height),
        )?;

        let x = hw - self.button_centre_inset;
        let (bw, bt) = (
            self.button_cutout_width / 2.0,
            self.button_cutout_depth_frac * ht,
        );
        let recess = block(
            ctx,
            DVec3::new(x - bw, -bt, floor - self.button_height),
            DVec3::new(x + bw, bt, floor + CLEARANCE),
        )?;
        Feature::subtractive(slot).combine(ctx.kernel, &Feature::subtractive(recess))
    }
}

/// Pair of column positions, each column lapping `brim` over the slot
fn column_points(reader: &Reader, col_width: f64, brim: f64) -> Vec<DVec2> {
    rect_array(reader.width + col_width - brim, 1.0, 2, 1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooxStandV1 {
    pub reader: Reader,
    pub brim: f64,

    pub col_width: f64,
    pub col_depth: f64,
    pub col_height: f64,

    pub base_height: f64,
    pub base_bottom_chamfer: f64,
    pub base_fillet: f64,
}

impl Default for BooxStandV1 {
    fn default() -> Self {
        let brim = 3.0;
        Self {
            reader: Reader::default(),
            brim,
            col_width: 20.0,
            col_depth: 30.0,
            col_height: 60.0,
            base_height: 25.0 + brim,
            base_bottom_chamfer: 3.0,
            base_fillet: 8.0,
        }
    }
}

impl BooxStandV1 {
    fn base_width(&self) -> f64 {
        self.reader.width + 2.0 * self.col_width
    }

    fn body(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let base = Prism::new(
            Outline::rounded(self.base_width(), self.col_depth, self.base_fillet),
            self.base_height,
        )
        .bottom(Edge::Chamfer(self.base_bottom_chamfer))
        .build(ctx, &SketchPlane::xy(), DVec2::ZERO)?;

        let deck = SketchPlane::xy().offset(self.base_height - CLEARANCE);
        let columns = patterned(
            ctx,
            &column_points(&self.reader, self.col_width, self.brim),
            |p| {
                Prism::new(
                    Outline::rounded(self.col_width + self.brim, self.col_depth, self.base_fillet),
                    self.col_height + CLEARANCE,
                )
                .top(Edge::Round(self.base_fillet))
                .build(ctx, &deck, p)
            },
        )?;
        Feature::additive(base).combine(ctx.kernel, &columns)
    }
}

impl PartGenerator for BooxStandV1 {
    fn name(&self) -> &'static str {
        "boox_stand_v1"
    }

    fn description(&self) -> &'static str {
        "E-reader stand with columns on a chamfered base"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let blank = self.reader.blank(
            ctx,
            self.base_height - self.brim,
            self.col_height + 2.0 * self.brim,
        )?;
        let solid = self.body(ctx)?.combine(ctx.kernel, &blank)?.resolve(ctx.kernel)?;
        Ok(vec![BuiltPart::new("boox_stand_v1", solid)])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooxStandV2 {
    pub reader: Reader,
    pub brim: f64,

    pub col_width: f64,
    pub col_depth: f64,
    pub col_height: f64,
    pub col_fillet: f64,
    /// Shift of the columns along Y
    pub col_pushback: f64,

    pub base_depth: f64,
    pub base_height: f64,
    pub base_fillet: f64,

    /// Height sliced off the rounded bottom to flatten it
    pub bottom_slice_off: f64,
}

impl Default for BooxStandV2 {
    fn default() -> Self {
        let brim = 3.0;
        Self {
            reader: Reader::default(),
            brim,
            col_width: 25.0,
            col_depth: 40.0,
            col_height: 60.0,
            col_fillet: 10.0,
            col_pushback: 0.0,
            base_depth: 20.0,
            base_height: 30.0 + brim,
            base_fillet: 8.0,
            bottom_slice_off: 1.0,
        }
    }
}

impl BooxStandV2 {
    fn base_width(&self) -> f64 {
        self.reader.width + self.col_width
    }

    /// Columns rounded on every edge, rising through the bar
    fn columns(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let plane = SketchPlane::xy().offset(-self.bottom_slice_off);
        let shift = DVec2::new(0.0, self.col_pushback);
        let points: Vec<DVec2> = column_points(&self.reader, self.col_width, self.brim)
            .into_iter()
            .map(|p| p + shift)
            .collect();
        patterned(ctx, &points, |p| {
            Prism::new(
                Outline::rounded(self.col_width + self.brim, self.col_depth, self.col_fillet),
                self.col_height + self.base_height,
            )
            .bottom(Edge::Round(self.col_fillet))
            .top(Edge::Round(self.col_fillet))
            .build(ctx, &plane, p)
        })
    }

    /// Bar joining the columns, rounded along its length
    fn bar(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let height = self.base_height + self.bottom_slice_off;
        let width = self.base_width();
        // Local X is world Y and local Y is world Z
        let bar = Prism::new(
            Outline::rounded(self.base_depth, height, self.base_fillet),
            width,
        )
        .build(
            ctx,
            &SketchPlane::yz().offset(-width / 2.0),
            DVec2::new(0.0, (self.base_height - self.bottom_slice_off) / 2.0),
        )?;
        Ok(Feature::additive(bar))
    }

    /// Everything below z = 0
    fn floor(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let reach = 2.0 * (self.base_width() + self.col_width + self.col_depth);
        let floor = block(
            ctx,
            DVec3::new(-reach, -reach, -2.0 * self.bottom_slice_off - CLEARANCE),
            DVec3::new(reach, reach, 0.0),
        )?;
        Ok(Feature::subtractive(floor))
    }

    fn blank(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        self.reader.blank(
            ctx,
            self.base_height - self.brim,
            self.col_height + 2.0 * self.brim + self.bottom_slice_off,
        )
    }

    /// Bar and columns with the slot and the floor cut, plus `extra` cutters
    fn bracket(&self, ctx: &BuildContext<'_>, extra: Feature) -> FeatureResult<Feature> {
        let body = self.bar(ctx)?.combine(ctx.kernel, &self.columns(ctx)?)?;
        combine_features(
            ctx.kernel,
            [body, extra, self.blank(ctx)?, self.floor(ctx)?],
        )
    }
}

impl PartGenerator for BooxStandV2 {
    fn name(&self) -> &'static str {
        "boox_stand_v2"
    }

    fn description(&self) -> &'static str {
        "E-reader stand with rounded columns through a rounded bar"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        let solid = self.bracket(ctx, Feature::empty())?.resolve(ctx.kernel)?;
        Ok(vec![BuiltPart::new("boox_stand_v2", solid)])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooxStandWithBase {
    pub stand: BooxStandV2,

    pub base_cutout_count: u32,
    /// Cutout width as a fraction of the cutout pitch
    pub base_cutout_width_frac: f64,
    /// Cutout height as a fraction of the bar height
    pub base_cutout_height_frac: f64,

    pub foot_width: f64,
    pub foot_count: u32,
    pub foot_depth: f64,
    pub foot_corner_radius: f64,
    pub foot_chamfer: f64,
    pub foot_thickness: f64,
}

impl Default for BooxStandWithBase {
    fn default() -> Self {
        let brim = 4.0;
        Self {
            stand: BooxStandV2 {
                reader: Reader {
                    width: 135.5,
                    ..Reader::default()
                },
                brim,
                col_width: 20.0,
                col_depth: 20.0,
                col_height: 60.0,
                col_fillet: 5.0,
                col_pushback: 0.0,
                base_depth: 18.0,
                base_height: 100.0 + brim,
                base_fillet: 5.0,
                bottom_slice_off: 1.0,
            },
            base_cutout_count: 4,
            base_cutout_width_frac: 0.6,
            base_cutout_height_frac: 0.8,
            foot_width: 40.0,
            foot_count: 2,
            foot_depth: 150.0,
            foot_corner_radius: 15.0,
            foot_chamfer: 2.0,
            foot_thickness: 10.0,
        }
    }
}

impl BooxStandWithBase {
    fn cutout_pitch(&self) -> f64 {
        (self.stand.base_width() + 2.0 * self.stand.col_width) / (self.base_cutout_count + 1) as f64
    }

    /// Pointed lightening windows through the bar
    fn cutouts(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let pitch = self.cutout_pitch();
        let width = pitch * self.base_cutout_width_frac;
        let height = self.stand.base_height * self.base_cutout_height_frac;
        let depth = self.stand.base_depth;
        // Normal is -Y, so this starts a full bar depth in front
        let plane = SketchPlane::xz().offset(-depth);
        let points = rect_array(pitch, 1.0, self.base_cutout_count, 1);

        let cutters = points
            .into_iter()
            .map(|p| {
                let center = DVec2::new(p.x, self.stand.base_height / 2.0);
                let wire = Wire2D::chamfered_rectangle(center, width, height, width * 0.499);
                Ok(Feature::additive(ctx.kernel.extrude(&wire, &plane, 2.0 * depth)?))
            })
            .collect::<CadResult<Vec<_>>>()?;
        Ok(combine_features(ctx.kernel, cutters)?.invert())
    }

    fn feet(&self, ctx: &BuildContext<'_>) -> FeatureResult<Feature> {
        let points = rect_array(2.0 * self.cutout_pitch(), 1.0, self.foot_count, 1);
        patterned(ctx, &points, |p| {
            Prism::new(
                Outline::rounded(self.foot_width, self.foot_depth, self.foot_corner_radius),
                self.foot_thickness,
            )
            .bottom(Edge::Chamfer(self.foot_chamfer))
            .top(Edge::Chamfer(self.foot_chamfer))
            .build(ctx, &SketchPlane::xy(), p)
        })
    }
}

impl PartGenerator for BooxStandWithBase {
    fn name(&self) -> &'static str {
        "boox_stand_with_base"
    }

    fn description(&self) -> &'static str {
        "Tall e-reader stand on two feet"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>> {
        // The feet stand on the cut floor, so the bracket is resolved first
        let bracket = self
            .stand
            .bracket(ctx, self.cutouts(ctx)?)?
            .resolve(ctx.kernel)?;
        let solid = Feature::additive(bracket)
            .combine(ctx.kernel, &self.feet(ctx)?)?
            .resolve(ctx.kernel)?;
        Ok(vec![BuiltPart::new("boox_stand_with_base", solid)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pf_cad::MeshKernel;

    #[test]
    fn test_columns_are_flush_with_base() {
        let v1 = BooxStandV1::default();
        let points = column_points(&v1.reader, v1.col_width, v1.brim);
        let outer = points[1].x + (v1.col_width + v1.brim) / 2.0;
        assert_relative_eq!(outer, v1.base_width() / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_blank_recess_sits_under_button() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let blank = Reader::default().blank(&ctx, 25.0, 66.0).unwrap();
        assert!(blank.positive().is_none());

        let (min, max) = kernel.bounds(blank.negative().unwrap()).unwrap();
        assert_relative_eq!(min.z, 23.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 91.0, epsilon = 1e-9);
        assert_relative_eq!(max.x, 67.9, epsilon = 1e-9);
        assert_relative_eq!(max.y, 3.25, epsilon = 1e-9);
    }

    #[test]
    fn test_v1_bounds() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let parts = BooxStandV1::default().build(&ctx).unwrap();
        assert_eq!(parts[0].name, "boox_stand_v1");

        let (min, max) = kernel.bounds(&parts[0].solid).unwrap();
        assert_relative_eq!(min.x, -87.9, epsilon = 1e-9);
        assert_relative_eq!(max.y, 15.0, epsilon = 1e-9);
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 88.0, epsilon = 1e-9);
    }

    #[test]
    fn test_v2_is_flattened() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let parts = BooxStandV2::default().build(&ctx).unwrap();

        let (min, max) = kernel.bounds(&parts[0].solid).unwrap();
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 92.0, epsilon = 1e-9);
        assert_relative_eq!(max.y, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cutout_layout() {
        let stand = BooxStandWithBase::default();
        assert_relative_eq!(stand.cutout_pitch(), 39.1, epsilon = 1e-9);

        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let cutouts = stand.cutouts(&ctx).unwrap();
        let (min, max) = kernel.bounds(cutouts.negative().unwrap()).unwrap();
        assert_relative_eq!(max.x, 1.5 * 39.1 + 0.3 * 39.1, epsilon = 1e-9);
        assert_relative_eq!(min.z, 52.0 - 41.6, epsilon = 1e-9);
        assert_relative_eq!(min.y, -18.0, epsilon = 1e-9);
        assert_relative_eq!(max.y, 18.0, epsilon = 1e-9);
    }

    #[test]
    fn test_with_base_stands_on_feet() {
        let kernel = MeshKernel::new();
        let ctx = BuildContext::new(&kernel, 16);
        let parts = BooxStandWithBase::default().build(&ctx).unwrap();

        let (min, max) = kernel.bounds(&parts[0].solid).unwrap();
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(min.y, -75.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 163.0, epsilon = 1e-9);
    }
}
