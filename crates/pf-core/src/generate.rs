//! Generation routine: build a generator's parts, then export each one

use std::path::PathBuf;

use pf_cad::{CadKernel, FeatureError, Solid};

use crate::config::DEFAULT_SEGMENTS;
use crate::export::{ExportError, ExportOptions, write_stl_atomic};
use crate::parts::{BuildContext, PartGenerator};

/// Settings shared by every generator run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub export: ExportOptions,
    /// Straight edges per full circle
    pub segments: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            export: ExportOptions::default(),
            segments: DEFAULT_SEGMENTS,
        }
    }
}

/// A part written to disk
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPart {
    pub name: String,
    pub path: PathBuf,
    pub triangles: usize,
}

type PartObserver<'k> = Box<dyn FnMut(&str, &Solid) + 'k>;

/// Runs part generators against a kernel and exports the results.
///
/// An optional observer sees every part after it is built and before it
/// is written.
pub struct Generator<'k> {
    kernel: &'k dyn CadKernel,
    options: GenerateOptions,
    on_part_ready: PartObserver<'k>,
}

impl<'k> Generator<'k> {
    pub fn new(kernel: &'k dyn CadKernel, options: GenerateOptions) -> Self {
        Self {
            kernel,
            options,
            on_part_ready: Box::new(|_, _| {}),
        }
    }

    /// Install the part-ready observer
    pub fn on_part_ready(mut self, observer: impl FnMut(&str, &Solid) + 'k) -> Self {
        self.on_part_ready = Box::new(observer);
        self
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Build every part of `generator` and export them.
    ///
    /// Nothing is written unless every part builds.
    pub fn run(
        &mut self,
        generator: &dyn PartGenerator,
    ) -> Result<Vec<ExportedPart>, GenerateError> {
        let ctx = BuildContext::new(self.kernel, self.options.segments);
        tracing::debug!(
            "Building {} at {} segments",
            generator.name(),
            ctx.segments
        );
        let parts = generator
            .build(&ctx)
            .map_err(|source| GenerateError::Build {
                generator: generator.name().to_string(),
                source,
            })?;

        let export = &self.options.export;
        std::fs::create_dir_all(&export.output_dir)
            .map_err(|e| GenerateError::Export(ExportError::Io(e.to_string())))?;

        let mut exported = Vec::with_capacity(parts.len());
        for part in parts {
            (self.on_part_ready)(&part.name, &part.solid);

            let path = export.part_path(&part.name);
            let triangles = write_stl_atomic(self.kernel, &part.solid, &path, export.format)?;
            tracing::info!(
                "Exported {} ({} triangles) to {}",
                part.name,
                triangles,
                path.display()
            );
            exported.push(ExportedPart {
                name: part.name,
                path,
                triangles,
            });
        }
        Ok(exported)
    }
}

/// Pick generators by name, keeping the order of `names`
pub fn select_generators<'a>(
    catalog: &'a [Box<dyn PartGenerator>],
    names: &[String],
) -> Result<Vec<&'a dyn PartGenerator>, GenerateError> {
    names
        .iter()
        .map(|name| {
            catalog
                .iter()
                .find(|g| g.name() == name.as_str())
                .map(|g| g.as_ref())
                .ok_or_else(|| GenerateError::UnknownGenerator(name.clone()))
        })
        .collect()
}

/// Generation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerateError {
    #[error("Building {generator} failed: {source}")]
    Build {
        generator: String,
        source: FeatureError,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Unknown generator: {0}")]
    UnknownGenerator(String),
}
