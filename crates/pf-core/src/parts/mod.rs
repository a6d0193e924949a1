//! Part catalog
//!
//! Every generator is a parameter struct (defaults are the shipped
//! dimensions, in millimetres) that implements [`PartGenerator`]. Generators
//! assemble their parts from independently written steps, each returning a
//! [`pf_cad::Feature`], and resolve them once per part.

pub mod boox_stand;
pub mod broom_clip;
pub mod card_box;
pub mod choc_block;
pub mod common;
pub mod craft_knife;
pub mod hot_intake;
pub mod pcb_sled;
pub mod picodvi_stand;
pub mod qfn_box;
pub mod scrap_tray;
pub mod steaming_hook;
pub mod toothbrush_holder;
pub mod window_clamp;
pub mod window_fitting;

use pf_cad::{CadKernel, FeatureResult, Solid};

use crate::config::PartParams;

pub use boox_stand::{BooxStandV1, BooxStandV2, BooxStandWithBase};
pub use broom_clip::BroomClip;
pub use card_box::CardBox;
pub use choc_block::ChocBlock;
pub use craft_knife::CraftKnife;
pub use hot_intake::HotIntake;
pub use pcb_sled::PcbSled;
pub use picodvi_stand::PicodviStand;
pub use qfn_box::QfnBox;
pub use scrap_tray::ScrapTray;
pub use steaming_hook::SteamingHook;
pub use toothbrush_holder::ToothbrushHolder;
pub use window_clamp::WindowClamp;
pub use window_fitting::WindowFitting;

/// Lowest accepted circle resolution
pub const MIN_SEGMENTS: u32 = 8;

/// Kernel and resolution shared by every step of a build
#[derive(Clone, Copy)]
pub struct BuildContext<'k> {
    pub kernel: &'k dyn CadKernel,
    /// Straight edges per full circle
    pub segments: u32,
}

impl<'k> BuildContext<'k> {
    pub fn new(kernel: &'k dyn CadKernel, segments: u32) -> Self {
        Self {
            kernel,
            segments: segments.max(MIN_SEGMENTS),
        }
    }
}

/// A resolved part ready for export
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPart {
    /// File stem of the exported mesh
    pub name: String,
    pub solid: Solid,
}

impl BuiltPart {
    pub fn new(name: impl Into<String>, solid: Solid) -> Self {
        Self {
            name: name.into(),
            solid,
        }
    }
}

/// A parametric generator producing one or more named parts
pub trait PartGenerator {
    /// Unique generator name (used on the command line and in config)
    fn name(&self) -> &'static str;

    /// One-line description
    fn description(&self) -> &'static str;

    /// Build every part of this generator
    fn build(&self, ctx: &BuildContext<'_>) -> FeatureResult<Vec<BuiltPart>>;
}

/// All generators, configured with `params`
pub fn catalog(params: &PartParams) -> Vec<Box<dyn PartGenerator>> {
    vec![
        Box::new(params.hot_intake.clone()),
        Box::new(params.window_fitting.clone()),
        Box::new(params.window_clamp.clone()),
        Box::new(params.steaming_hook.clone()),
        Box::new(params.broom_clip.clone()),
        Box::new(params.toothbrush_holder.clone()),
        Box::new(params.pcb_sled.clone()),
        Box::new(params.boox_stand_v1.clone()),
        Box::new(params.boox_stand_v2.clone()),
        Box::new(params.boox_stand_with_base.clone()),
        Box::new(params.qfn_box.clone()),
        Box::new(params.card_box.clone()),
        Box::new(params.choc_block.clone()),
        Box::new(params.craft_knife.clone()),
        Box::new(params.scrap_tray.clone()),
        Box::new(params.picodvi_stand.clone()),
    ]
}

/// Names of every generator in the catalog, in catalog order
pub fn generator_names() -> Vec<&'static str> {
    catalog(&PartParams::default())
        .iter()
        .map(|g| g.name())
        .collect()
}
