//! Every catalog generator builds at coarse resolution and exports.

use pf_cad::{CadKernel, MeshKernel};
use pf_core::export::StlFormat;
use pf_core::{
    BuildContext, ExportOptions, GenerateOptions, Generator, GeneratorConfig, PartParams, catalog,
};

const SEGMENTS: u32 = 16;

#[test]
fn test_every_generator_builds_closed_parts() {
    let kernel = MeshKernel::new();
    let ctx = BuildContext::new(&kernel, SEGMENTS);

    for generator in catalog(&PartParams::default()) {
        let parts = generator
            .build(&ctx)
            .unwrap_or_else(|e| panic!("{} failed: {e}", generator.name()));
        assert!(!parts.is_empty(), "{} built nothing", generator.name());

        for part in parts {
            assert!(
                part.name.starts_with(generator.name()),
                "{} produced {}",
                generator.name(),
                part.name
            );
            let volume = kernel.volume(&part.solid).unwrap();
            assert!(volume > 0.0, "{} has volume {volume}", part.name);

            let (min, max) = kernel.bounds(&part.solid).unwrap();
            let size = max - min;
            assert!(
                size.min_element() > 1.0 && size.max_element() < 400.0,
                "{} has implausible size {size}",
                part.name
            );
        }
    }
}

#[test]
fn test_expected_part_names() {
    let kernel = MeshKernel::new();
    let ctx = BuildContext::new(&kernel, SEGMENTS);
    let names: Vec<String> = catalog(&PartParams::default())
        .iter()
        .flat_map(|g| g.build(&ctx).unwrap())
        .map(|p| p.name)
        .collect();

    assert_eq!(
        names,
        vec![
            "hot_intake_plate",
            "hot_intake_fitting",
            "window_fitting_inner",
            "window_fitting_outer",
            "window_clamp_17",
            "window_clamp_43",
            "window_clamp_plate",
            "steaming_hook",
            "broom_clip",
            "toothbrush_holder",
            "pcb_sled_W100_H65",
            "boox_stand_v1",
            "boox_stand_v2",
            "boox_stand_with_base",
            "qfn_box_10mm_4x4_base",
            "qfn_box_10mm_4x4_lid",
            "card_box",
            "choc_block_case_5x4",
            "choc_block_base_5x4",
            "craft_knife",
            "scrap_tray",
            "picodvi_stand",
        ]
    );
}

#[test]
fn test_generate_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = GeneratorConfig::default();
    config.output_dir = dir.path().to_path_buf();
    config.segments = SEGMENTS;
    config.params.window_clamp.l4_options = vec![20.0];

    let kernel = MeshKernel::new();
    let generators = catalog(&config.params);
    let clamp = generators
        .iter()
        .find(|g| g.name() == "window_clamp")
        .unwrap();

    let mut ready = Vec::new();
    let exported = Generator::new(&kernel, config.generate_options())
        .on_part_ready(|name, solid| ready.push((name.to_string(), solid.clone())))
        .run(clamp.as_ref())
        .unwrap();

    let names: Vec<&str> = exported.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["window_clamp_20", "window_clamp_plate"]);
    assert_eq!(ready.len(), 2);

    for part in &exported {
        let mut file = std::fs::File::open(&part.path).unwrap();
        let mesh = stl_io::read_stl(&mut file).unwrap();
        assert_eq!(mesh.faces.len(), part.triangles);
    }
    // The observer saw the same solids that were exported
    let mesh = kernel.tessellate(&ready[1].1).unwrap();
    assert_eq!(mesh.triangle_count(), exported[1].triangles);
}

#[test]
fn test_ascii_export_option() {
    let dir = tempfile::tempdir().unwrap();
    let options = GenerateOptions {
        export: ExportOptions {
            output_dir: dir.path().to_path_buf(),
            format: StlFormat::Ascii,
        },
        segments: SEGMENTS,
    };
    let kernel = MeshKernel::new();
    let generators = catalog(&PartParams::default());
    let sled = generators.iter().find(|g| g.name() == "pcb_sled").unwrap();

    let exported = Generator::new(&kernel, options).run(sled.as_ref()).unwrap();
    let text = std::fs::read_to_string(&exported[0].path).unwrap();
    assert!(text.starts_with("solid mesh"));
    assert_eq!(text.matches("endfacet").count(), exported[0].triangles);
}
