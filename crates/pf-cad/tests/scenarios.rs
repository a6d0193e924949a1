//! End-to-end combinator scenarios on the mesh kernel.

use approx::assert_relative_eq;
use glam::DVec3;
use pf_cad::{CadKernel, Feature, MeshKernel, Solid, SolidOps, resolve_features};
use std::f64::consts::TAU;

const SEGMENTS: u32 = 32;

/// Axis-aligned cube occupying `[0, size]^3`.
fn cube(kernel: &MeshKernel, size: f64) -> Solid {
    kernel
        .create_box(DVec3::splat(size / 2.0), DVec3::splat(size))
        .unwrap()
}

fn permutations(items: &[Feature]) -> Vec<Vec<Feature>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            result.push(tail);
        }
    }
    result
}

#[test]
fn cube_with_boss_minus_cylinder_is_order_independent() {
    let kernel = MeshKernel::new();

    let a = Feature::additive(cube(&kernel, 10.0));
    let cylinder = kernel
        .create_cylinder(DVec3::new(0.0, 0.0, 5.0), 2.0, 10.0, DVec3::Z, SEGMENTS)
        .unwrap();
    let b = Feature::subtractive(cylinder);
    let c = Feature::additive(cube(&kernel, 4.0))
        .translate(&kernel, DVec3::new(3.0, 3.0, 0.0))
        .unwrap();

    // The cylinder sits on the cube's corner edge, so a quarter of it is cut.
    let n = SEGMENTS as f64;
    let disc = 0.5 * n * 4.0 * (TAU / n).sin();
    let expected = 1000.0 - disc * 10.0 / 4.0;

    let orders = permutations(&[a, b, c]);
    assert_eq!(orders.len(), 6);
    for order in orders {
        let solid = resolve_features(&kernel, order).unwrap();
        assert_relative_eq!(kernel.volume(&solid).unwrap(), expected, max_relative = 1e-9);

        let (min, max) = kernel.bounds(&solid).unwrap();
        assert_relative_eq!(min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 10.0, epsilon = 1e-9);

        let mesh = kernel.tessellate(&solid).unwrap();
        assert_relative_eq!(mesh.volume(), expected, max_relative = 1e-4);
    }
}

#[test]
fn combining_a_solid_with_itself_resolves_to_the_solid() {
    let kernel = MeshKernel::new();
    let s = cube(&kernel, 3.0);
    let f = Feature::additive(s.clone());

    let doubled = f.combine(&kernel, &f).unwrap().resolve(&kernel).unwrap();
    assert_relative_eq!(
        kernel.volume(&doubled).unwrap(),
        kernel.volume(&s).unwrap(),
        max_relative = 1e-9
    );
    assert_eq!(kernel.bounds(&doubled).unwrap(), kernel.bounds(&s).unwrap());
}

#[test]
fn inverted_groove_becomes_a_rib() {
    let kernel = MeshKernel::new();
    let plate = Feature::additive(
        kernel
            .create_box(DVec3::new(0.0, 0.0, -1.0), DVec3::new(10.0, 10.0, 2.0))
            .unwrap(),
    );
    let groove = Feature::subtractive(
        kernel
            .create_box(DVec3::new(0.0, 0.0, -0.5), DVec3::new(12.0, 1.0, 1.0))
            .unwrap(),
    );

    let cut = resolve_features(&kernel, [plate.clone(), groove.clone()]).unwrap();
    assert_relative_eq!(kernel.volume(&cut).unwrap(), 190.0, max_relative = 1e-9);

    // Flipped and inverted, the same groove adds material on top.
    let rib = groove
        .rotate(&kernel, DVec3::X, 180.0)
        .unwrap()
        .invert();
    let ribbed = resolve_features(&kernel, [plate, rib]).unwrap();
    assert_relative_eq!(kernel.volume(&ribbed).unwrap(), 212.0, max_relative = 1e-9);
    let (_, max) = kernel.bounds(&ribbed).unwrap();
    assert_relative_eq!(max.z, 1.0, epsilon = 1e-9);
}

#[test]
fn rotation_commutes_with_resolve_on_the_mesh_kernel() {
    let kernel = MeshKernel::new();
    let f = Feature::new(
        Some(cube(&kernel, 4.0)),
        Some(
            kernel
                .create_box(DVec3::new(4.0, 4.0, 2.0), DVec3::splat(2.0))
                .unwrap(),
        ),
    );

    let rotated_first = f
        .rotate(&kernel, DVec3::Z, 90.0)
        .unwrap()
        .resolve(&kernel)
        .unwrap();
    let resolved = f.resolve(&kernel).unwrap();
    let rotated_after = kernel
        .rotate(&resolved, &pf_cad::Axis3D::z(), 90f64.to_radians())
        .unwrap();

    assert_relative_eq!(
        kernel.volume(&rotated_first).unwrap(),
        kernel.volume(&rotated_after).unwrap(),
        max_relative = 1e-9
    );
    let (min_a, max_a) = kernel.bounds(&rotated_first).unwrap();
    let (min_b, max_b) = kernel.bounds(&rotated_after).unwrap();
    assert!(min_a.abs_diff_eq(min_b, 1e-9));
    assert!(max_a.abs_diff_eq(max_b, 1e-9));
}
