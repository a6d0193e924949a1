//! Subcommand implementations

use std::path::Path;

use anyhow::{Context, Result, bail};
use pf_cad::CadKernel;
use pf_core::{Generator, GeneratorConfig, StlFormat, catalog, select_generators};

use crate::GenerateArgs;

pub fn list() -> Result<()> {
    for generator in catalog(&Default::default()) {
        println!("{:<20} {}", generator.name(), generator.description());
    }
    Ok(())
}

/// Configuration file (or defaults) with command line overrides applied
fn resolve_config(args: &GenerateArgs) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(out) = &args.out {
        config.output_dir = out.clone();
    }
    if let Some(segments) = args.segments {
        config.segments = segments;
    }
    if args.ascii {
        config.format = StlFormat::Ascii;
    }
    if !args.names.is_empty() {
        config.enabled = args.names.clone();
    }
    Ok(config)
}

pub fn generate(args: GenerateArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    generate_with(&config, pf_cad::default_kernel)
}

/// Run every enabled generator, each on a kernel from `make_kernel`.
///
/// A kernel keeps every intermediate solid, so each generator gets its
/// own and everything it built is dropped before the next one starts.
fn generate_with(
    config: &GeneratorConfig,
    make_kernel: impl Fn() -> Box<dyn CadKernel>,
) -> Result<()> {
    let generators = catalog(&config.params);
    let selected = select_generators(&generators, &config.enabled)?;
    tracing::info!(
        "Generating {} part set(s) into {}",
        selected.len(),
        config.output_dir.display()
    );

    let mut failed = Vec::new();
    for part_set in selected {
        let kernel = make_kernel();
        tracing::debug!("Building {} on the {} kernel", part_set.name(), kernel.name());
        let mut generator = Generator::new(kernel.as_ref(), config.generate_options())
            .on_part_ready(|name, _| tracing::debug!("Part ready: {}", name));

        match generator.run(part_set) {
            Ok(parts) => {
                for part in parts {
                    println!("{}", part.path.display());
                }
            }
            Err(e) => {
                tracing::error!("{}", e);
                failed.push(part_set.name());
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} generator(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}

pub fn dump_config(path: Option<&Path>) -> Result<()> {
    let config = GeneratorConfig::default();
    match path {
        Some(path) => {
            config
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote default configuration to {}", path.display());
        }
        None => {
            let bytes = config.to_bytes()?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;

    fn args() -> GenerateArgs {
        GenerateArgs {
            names: Vec::new(),
            config: None,
            out: None,
            segments: None,
            ascii: false,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_config(&args()).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pf.ron");
        let file = GeneratorConfig {
            segments: 24,
            output_dir: PathBuf::from("from_file"),
            enabled: vec!["broom_clip".into()],
            ..GeneratorConfig::default()
        };
        file.save(&path).unwrap();

        let config = resolve_config(&GenerateArgs {
            config: Some(path),
            out: Some(PathBuf::from("from_flag")),
            ascii: true,
            ..args()
        })
        .unwrap();
        assert_eq!(config.segments, 24);
        assert_eq!(config.output_dir, PathBuf::from("from_flag"));
        assert_eq!(config.format, StlFormat::Ascii);
        assert_eq!(config.enabled, vec!["broom_clip"]);
    }

    #[test]
    fn test_names_replace_enabled() {
        let config = resolve_config(&GenerateArgs {
            names: vec!["pcb_sled".into()],
            segments: Some(12),
            ..args()
        })
        .unwrap();
        assert_eq!(config.enabled, vec!["pcb_sled"]);
        assert_eq!(config.segments, 12);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_config(&GenerateArgs {
            config: Some(dir.path().join("absent.ron")),
            ..args()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_each_generator_gets_a_fresh_kernel() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            output_dir: dir.path().to_path_buf(),
            segments: 8,
            enabled: vec!["steaming_hook".into(), "broom_clip".into()],
            ..GeneratorConfig::default()
        };
        let made = Cell::new(0);
        generate_with(&config, || {
            made.set(made.get() + 1);
            pf_cad::default_kernel()
        })
        .unwrap();
        assert_eq!(made.get(), 2);
        assert!(dir.path().join("steaming_hook.stl").exists());
        assert!(dir.path().join("broom_clip.stl").exists());
    }

    #[test]
    fn test_failed_generator_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GeneratorConfig {
            output_dir: dir.path().to_path_buf(),
            segments: 8,
            enabled: vec!["window_clamp".into(), "steaming_hook".into()],
            ..GeneratorConfig::default()
        };
        config.params.window_clamp.l4_options.clear();
        let err = generate_with(&config, pf_cad::default_kernel).unwrap_err();
        assert!(err.to_string().contains("window_clamp"));
        assert!(dir.path().join("steaming_hook.stl").exists());
    }

    #[test]
    fn test_dump_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pf.ron");
        dump_config(Some(&path)).unwrap();
        assert_eq!(GeneratorConfig::load(&path).unwrap(), GeneratorConfig::default());
    }
}
