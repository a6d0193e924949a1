//! Deferred Feature Combinator
//!
//! A [`Feature`] is a pair of optional solids: material to add (positive)
//! and material to remove (negative). Part steps each produce a Feature;
//! combining them only ever unions like with like, and the single
//! subtraction happens in [`Feature::resolve`]. Cuts therefore never depend
//! on the order in which independently written steps are combined.

use glam::DVec3;
use thiserror::Error;

use crate::kernel::{Axis3D, BooleanType, CadError, Solid, SolidOps};

/// Feature-related errors
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("CAD kernel error: {0}")]
    Kernel(#[source] CadError),
}

impl From<CadError> for FeatureError {
    fn from(err: CadError) -> Self {
        match err {
            CadError::DegenerateResult(msg) => FeatureError::InvalidGeometry(msg),
            other => FeatureError::Kernel(other),
        }
    }
}

/// Result type for feature operations
pub type FeatureResult<T> = Result<T, FeatureError>;

/// A deferred (positive, negative) pair of solids.
///
/// Immutable: every operation returns a new Feature. `Feature::default()`
/// has both sides absent and is the identity for [`Feature::combine`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feature {
    positive: Option<Solid>,
    negative: Option<Solid>,
}

impl Feature {
    /// Create a feature from optional positive and negative solids
    pub fn new(positive: Option<Solid>, negative: Option<Solid>) -> Self {
        Self { positive, negative }
    }

    /// The identity feature (nothing to add, nothing to remove)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Feature that only adds material
    pub fn additive(solid: Solid) -> Self {
        Self::new(Some(solid), None)
    }

    /// Feature that only removes material
    pub fn subtractive(solid: Solid) -> Self {
        Self::new(None, Some(solid))
    }

    pub fn positive(&self) -> Option<&Solid> {
        self.positive.as_ref()
    }

    pub fn negative(&self) -> Option<&Solid> {
        self.negative.as_ref()
    }

    /// Whether both sides are absent
    pub fn is_empty(&self) -> bool {
        self.positive.is_none() && self.negative.is_none()
    }

    /// Union positives with positives and negatives with negatives.
    ///
    /// No subtraction happens here. An absent side passes the other
    /// feature's side through without a kernel call.
    pub fn combine<K: SolidOps + ?Sized>(
        &self,
        kernel: &K,
        other: &Feature,
    ) -> FeatureResult<Feature> {
        Ok(Feature {
            positive: union_optional(kernel, self.positive.as_ref(), other.positive.as_ref())?,
            negative: union_optional(kernel, self.negative.as_ref(), other.negative.as_ref())?,
        })
    }

    /// Left fold of [`Feature::combine`] starting from the empty feature
    pub fn combine_all<K, I>(kernel: &K, features: I) -> FeatureResult<Feature>
    where
        K: SolidOps + ?Sized,
        I: IntoIterator<Item = Feature>,
    {
        features
            .into_iter()
            .try_fold(Feature::empty(), |acc, f| acc.combine(kernel, &f))
    }

    /// Swap the positive and negative sides
    pub fn invert(&self) -> Feature {
        Feature {
            positive: self.negative.clone(),
            negative: self.positive.clone(),
        }
    }

    /// Translate whichever sides are present
    pub fn translate<K: SolidOps + ?Sized>(
        &self,
        kernel: &K,
        offset: DVec3,
    ) -> FeatureResult<Feature> {
        self.map_sides(|solid| kernel.translate(solid, offset))
    }

    pub fn translate_x<K: SolidOps + ?Sized>(
        &self,
        kernel: &K,
        distance: f64,
    ) -> FeatureResult<Feature> {
        self.translate(kernel, DVec3::X * distance)
    }

    pub fn translate_y<K: SolidOps + ?Sized>(
        &self,
        kernel: &K,
        distance: f64,
    ) -> FeatureResult<Feature> {
        self.translate(kernel, DVec3::Y * distance)
    }

    pub fn translate_z<K: SolidOps + ?Sized>(
        &self,
        kernel: &K,
        distance: f64,
    ) -> FeatureResult<Feature> {
        self.translate(kernel, DVec3::Z * distance)
    }

    /// Rotate whichever sides are present about an axis through the origin
    ///
    /// # Arguments
    /// * `axis` - Axis direction (need not be normalized)
    /// * `angle_degrees` - Rotation angle in degrees, right-hand rule
    pub fn rotate<K: SolidOps + ?Sized>(
        &self,
        kernel: &K,
        axis: DVec3,
        angle_degrees: f64,
    ) -> FeatureResult<Feature> {
        if axis.length_squared() == 0.0 {
            return Err(FeatureError::InvalidGeometry("rotation axis is zero".into()));
        }
        let axis = Axis3D::new(DVec3::ZERO, axis);
        let angle = angle_degrees.to_radians();
        self.map_sides(|solid| kernel.rotate(solid, &axis, angle))
    }

    /// Collapse the feature into one solid: `positive - negative`.
    ///
    /// The subtraction runs exactly once. Without a negative side the
    /// positive solid is returned as is.
    pub fn resolve<K: SolidOps + ?Sized>(self, kernel: &K) -> FeatureResult<Solid> {
        let Some(positive) = self.positive else {
            return Err(FeatureError::InvalidGeometry(
                "feature has no positive solid to resolve".into(),
            ));
        };
        match self.negative {
            None => Ok(positive),
            Some(negative) => {
                tracing::debug!("Resolving feature: {} - {}", positive.id, negative.id);
                Ok(kernel.boolean(&positive, &negative, BooleanType::Subtract)?)
            }
        }
    }

    fn map_sides(
        &self,
        mut f: impl FnMut(&Solid) -> Result<Solid, CadError>,
    ) -> FeatureResult<Feature> {
        let positive = self.positive.as_ref().map(&mut f).transpose()?;
        let negative = self.negative.as_ref().map(&mut f).transpose()?;
        Ok(Feature { positive, negative })
    }
}

fn union_optional<K: SolidOps + ?Sized>(
    kernel: &K,
    a: Option<&Solid>,
    b: Option<&Solid>,
) -> FeatureResult<Option<Solid>> {
    match (a, b) {
        (None, None) => Ok(None),
        (Some(x), None) | (None, Some(x)) => Ok(Some(x.clone())),
        (Some(x), Some(y)) => Ok(Some(kernel.boolean(x, y, BooleanType::Union)?)),
    }
}

/// Shorthand for [`Feature::combine_all`]
pub fn combine_features<K, I>(kernel: &K, features: I) -> FeatureResult<Feature>
where
    K: SolidOps + ?Sized,
    I: IntoIterator<Item = Feature>,
{
    Feature::combine_all(kernel, features)
}

/// Combine all features and resolve the result
pub fn resolve_features<K, I>(kernel: &K, features: I) -> FeatureResult<Solid>
where
    K: SolidOps + ?Sized,
    I: IntoIterator<Item = Feature>,
{
    combine_features(kernel, features)?.resolve(kernel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{CadKernel, MeshKernel};
    use approx::assert_relative_eq;

    fn cube(kernel: &MeshKernel, min: DVec3, size: f64) -> Solid {
        kernel
            .create_box(min + DVec3::splat(size / 2.0), DVec3::splat(size))
            .unwrap()
    }

    #[test]
    fn test_empty_is_identity() {
        let kernel = MeshKernel::new();
        let a = Feature::new(
            Some(cube(&kernel, DVec3::ZERO, 2.0)),
            Some(cube(&kernel, DVec3::ONE, 1.0)),
        );
        assert_eq!(a.combine(&kernel, &Feature::empty()).unwrap(), a);
        assert_eq!(Feature::empty().combine(&kernel, &a).unwrap(), a);
    }

    #[test]
    fn test_combine_passes_absent_sides_through() {
        let kernel = MeshKernel::new();
        let p = cube(&kernel, DVec3::ZERO, 2.0);
        let n = cube(&kernel, DVec3::ONE, 2.0);
        let combined = Feature::additive(p.clone())
            .combine(&kernel, &Feature::subtractive(n.clone()))
            .unwrap();
        assert_eq!(combined.positive(), Some(&p));
        assert_eq!(combined.negative(), Some(&n));
    }

    #[test]
    fn test_invert_twice_is_identity() {
        let kernel = MeshKernel::new();
        let f = Feature::additive(cube(&kernel, DVec3::ZERO, 1.0));
        assert_eq!(f.invert().positive(), None);
        assert_eq!(f.invert().invert(), f);
    }

    #[test]
    fn test_resolve_without_positive_fails() {
        let kernel = MeshKernel::new();
        assert!(matches!(
            Feature::empty().resolve(&kernel),
            Err(FeatureError::InvalidGeometry(_))
        ));
        let negative_only = Feature::subtractive(cube(&kernel, DVec3::ZERO, 1.0));
        assert!(matches!(
            negative_only.resolve(&kernel),
            Err(FeatureError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_resolve_without_negative_is_noop() {
        let kernel = MeshKernel::new();
        let p = cube(&kernel, DVec3::ZERO, 1.0);
        let before = kernel.solid_count();
        assert_eq!(Feature::additive(p.clone()).resolve(&kernel).unwrap(), p);
        assert_eq!(kernel.solid_count(), before);
    }

    #[test]
    fn test_resolve_subtracts_once() {
        let kernel = MeshKernel::new();
        let f = Feature::new(
            Some(cube(&kernel, DVec3::ZERO, 2.0)),
            Some(cube(&kernel, DVec3::ONE, 2.0)),
        );
        let solid = f.resolve(&kernel).unwrap();
        assert_relative_eq!(kernel.volume(&solid).unwrap(), 7.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cut_everything_is_invalid_geometry() {
        let kernel = MeshKernel::new();
        let f = Feature::new(
            Some(cube(&kernel, DVec3::ONE, 1.0)),
            Some(cube(&kernel, DVec3::ZERO, 4.0)),
        );
        assert!(matches!(f.resolve(&kernel), Err(FeatureError::InvalidGeometry(_))));
    }

    #[test]
    fn test_kernel_errors_pass_through() {
        let kernel = crate::kernel::NullKernel;
        let stale = Solid::new(uuid::Uuid::new_v4());
        let f = Feature::additive(stale.clone());
        let err = f.combine(&kernel, &Feature::additive(stale)).unwrap_err();
        assert!(matches!(err, FeatureError::Kernel(CadError::KernelNotAvailable(_))));
    }

    #[test]
    fn test_transforms_leave_absent_sides_absent() {
        let kernel = MeshKernel::new();
        let f = Feature::subtractive(cube(&kernel, DVec3::ZERO, 1.0));
        let moved = f.translate_z(&kernel, 5.0).unwrap();
        assert!(moved.positive().is_none());
        let (min, _) = kernel.bounds(moved.negative().unwrap()).unwrap();
        assert_relative_eq!(min.z, 5.0, epsilon = 1e-12);

        let turned = moved.rotate(&kernel, DVec3::X, 180.0).unwrap();
        assert!(turned.positive().is_none());
        let (_, max) = kernel.bounds(turned.negative().unwrap()).unwrap();
        assert_relative_eq!(max.z, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_combine_all_of_nothing_is_empty() {
        let kernel = MeshKernel::new();
        let none: Vec<Feature> = Vec::new();
        assert_eq!(Feature::combine_all(&kernel, none).unwrap(), Feature::empty());
    }

    #[test]
    fn test_combine_features_folds_in_order() {
        let kernel = MeshKernel::new();
        let solid = resolve_features(
            &kernel,
            [
                Feature::additive(cube(&kernel, DVec3::ZERO, 2.0)),
                Feature::subtractive(cube(&kernel, DVec3::ONE, 2.0)),
                Feature::additive(cube(&kernel, DVec3::new(4.0, 0.0, 0.0), 1.0)),
            ],
        )
        .unwrap();
        assert_relative_eq!(kernel.volume(&solid).unwrap(), 8.0, epsilon = 1e-6);
    }
}
