// ============================================================
// Layer 6 - Artifact Store
// ============================================================
// The only contract between a training run and a serving
// process. One directory holds every fitted piece of a pipeline
// under fixed, well-known names:
//
//   artifacts/
//     label_encoder.json          ← class labels, sorted
//     vectorizer.json             ← fitted transformer (if any)
//     emotion_detector.mpk        ← classifier weights
//     emotion_detector.json       ← manifest: architecture, transformer
//                                   kind, training configuration
//     emotion_detector_metrics.csv
//
// Saving writes everything into a staging directory first. The
// live files are then moved aside, the staged ones moved in with
// the manifest last, and any failure moves the old set back, so
// a failed run never leaves a half-updated set behind.
//
// Loading cross-checks the pieces against the manifest: the
// transformer width must equal the classifier input, the label
// count must equal the output width, and the stored weights
// must have the shapes the manifest describes.
//
// Reference: Burn Book §5 (Records)

use anyhow::{bail, Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::features::{ensure_kind, FeatureTransformer, TransformerKind};
use crate::data::label_encoder::LabelEncoder;
use crate::domain::pipeline::{ArtifactNames, PipelineKind};
use crate::domain::traits::Persistable;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{record_layer_dims, Classifier, ClassifierConfig, ClassifierRecord};
use crate::ml::trainer::InferBackend;

type WeightsRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

/// Everything needed to rebuild the classifier and its input transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub pipeline:    PipelineKind,
    pub classifier:  ClassifierConfig,
    pub transformer: TransformerKind,
    pub train:       TrainConfig,
}

/// Output of one successful training run.
pub struct TrainedArtifacts {
    pub encoder:     LabelEncoder,
    pub transformer: FeatureTransformer,
    pub model:       Classifier<InferBackend>,
    pub manifest:    Manifest,
    pub metrics:     Vec<EpochMetrics>,
}

/// Artifacts read back from disk, already checked for consistency.
pub struct LoadedArtifacts {
    pub encoder:     LabelEncoder,
    pub transformer: FeatureTransformer,
    pub model:       Classifier<InferBackend>,
    pub manifest:    Manifest,
}

pub struct ArtifactStore {
    dir:   PathBuf,
    names: ArtifactNames,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, names: ArtifactNames) -> Self {
        Self { dir: dir.into(), names }
    }

    pub fn for_pipeline(dir: impl Into<PathBuf>, kind: PipelineKind) -> Self {
        Self::new(dir, kind.spec().artifacts)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(self.names.manifest_file())
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.dir.join(self.names.metrics_file())
    }

    /// Weights file path; the recorder appends `.mpk`.
    fn weights_stem(dir: &Path, names: &ArtifactNames) -> PathBuf {
        dir.join(names.model)
    }

    fn weights_file(&self) -> String {
        format!("{}.mpk", self.names.model)
    }

    // ─── Save ─────────────────────────────────────────────────────────────────

    pub fn save(&self, artifacts: &TrainedArtifacts) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", self.dir.display()))?;

        let staging = self.dir.join(format!(".staging-{}", self.names.model));
        remove_dir_if_present(&staging)?;
        fs::create_dir(&staging)
            .with_context(|| format!("Cannot create staging directory '{}'", staging.display()))?;

        let written = self.write_all(&staging, artifacts);
        let moved   = written.and_then(|files| {
            // An identity transform leaves no file; any previous one is retired
            let stale = (!artifacts.transformer.kind().has_artifact())
                .then(|| self.names.transformer.to_string());
            self.promote(&staging, &files, stale)
        });
        // Staging is scratch space either way
        let cleaned = remove_dir_if_present(&staging);
        moved?;
        cleaned?;

        tracing::info!("Artifacts saved to '{}'", self.dir.display());
        Ok(())
    }

    /// Write every artifact into `staging`; returns the file names written,
    /// manifest last.
    fn write_all(&self, staging: &Path, artifacts: &TrainedArtifacts) -> Result<Vec<String>> {
        let mut files = Vec::new();

        artifacts.encoder.save(&staging.join(self.names.label_encoder))?;
        files.push(self.names.label_encoder.to_string());

        if artifacts.transformer.kind().has_artifact() {
            artifacts.transformer.save(&staging.join(self.names.transformer))?;
            files.push(self.names.transformer.to_string());
        }

        let stem = Self::weights_stem(staging, &self.names);
        WeightsRecorder::new()
            .record(artifacts.model.clone().into_record(), stem.clone())
            .with_context(|| format!("Failed to save weights to '{}'", stem.display()))?;
        files.push(self.weights_file());

        MetricsLogger::write_all(&staging.join(self.names.metrics_file()), &artifacts.metrics)?;
        files.push(self.names.metrics_file());

        let manifest = serde_json::to_string_pretty(&artifacts.manifest)?;
        fs::write(staging.join(self.names.manifest_file()), manifest)
            .context("Cannot write manifest")?;
        files.push(self.names.manifest_file());

        Ok(files)
    }

    /// Replace the live set with the staged one as a unit.
    ///
    ///   1. move every live file about to be replaced (and `stale`) into
    ///      a backup directory
    ///   2. move the staged files into place
    ///   3. drop the backup
    ///
    /// A failure in 1 or 2 puts the backed-up files back, so the previous
    /// set stays loadable.
    fn promote(&self, staging: &Path, files: &[String], stale: Option<String>) -> Result<()> {
        let backup = self.dir.join(format!(".previous-{}", self.names.model));
        remove_dir_if_present(&backup)?;
        fs::create_dir(&backup)
            .with_context(|| format!("Cannot create backup directory '{}'", backup.display()))?;

        let mut retired   = Vec::new();
        let mut installed = Vec::new();
        let result = self
            .retire(&backup, files.iter().chain(stale.iter()), &mut retired)
            .and_then(|()| self.install(staging, files, &mut installed));

        match result {
            Ok(()) => remove_dir_if_present(&backup),
            Err(e) => {
                if self.rollback(&backup, &retired, &installed) {
                    let _ = fs::remove_dir(&backup);
                }
                Err(e)
            }
        }
    }

    fn retire<'a>(
        &self,
        backup:  &Path,
        files:   impl Iterator<Item = &'a String>,
        retired: &mut Vec<String>,
    ) -> Result<()> {
        for file in files {
            let target = self.dir.join(file);
            match fs::symlink_metadata(&target) {
                Ok(meta) if meta.is_file() => {
                    fs::rename(&target, backup.join(file))
                        .with_context(|| format!("Cannot back up '{}'", target.display()))?;
                    retired.push(file.clone());
                }
                Ok(_) => bail!("Artifact path '{}' exists and is not a file", target.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("Cannot inspect '{}'", target.display()))
                }
            }
        }
        Ok(())
    }

    fn install(&self, staging: &Path, files: &[String], installed: &mut Vec<String>) -> Result<()> {
        for file in files {
            let target = self.dir.join(file);
            fs::rename(staging.join(file), &target)
                .with_context(|| format!("Cannot move artifact into '{}'", target.display()))?;
            installed.push(file.clone());
            tracing::debug!("Wrote '{}'", target.display());
        }
        Ok(())
    }

    /// Undo a partial promotion. Returns whether every step succeeded.
    fn rollback(&self, backup: &Path, retired: &[String], installed: &[String]) -> bool {
        let mut clean = true;
        for file in installed {
            if let Err(e) = fs::remove_file(self.dir.join(file)) {
                tracing::warn!("Rollback could not remove '{}': {}", file, e);
                clean = false;
            }
        }
        for file in retired {
            if let Err(e) = fs::rename(backup.join(file), self.dir.join(file)) {
                tracing::warn!("Rollback could not restore '{}': {}", file, e);
                clean = false;
            }
        }
        if clean {
            tracing::warn!("Save failed; previous artifacts in '{}' restored", self.dir.display());
        }
        clean
    }

    // ─── Load ─────────────────────────────────────────────────────────────────

    pub fn load_manifest(&self) -> Result<Manifest> {
        let path = self.manifest_path();
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read manifest '{}'. Have you run 'train' first?",
                path.display()
            )
        })?;
        serde_json::from_str(&json).with_context(|| format!("Corrupt manifest '{}'", path.display()))
    }

    pub fn load(&self) -> Result<LoadedArtifacts> {
        let manifest = self.load_manifest()?;

        let encoder = LabelEncoder::load(&self.dir.join(self.names.label_encoder))?;
        let transformer =
            FeatureTransformer::load(manifest.transformer, &self.dir.join(self.names.transformer))?;
        ensure_kind(&transformer, manifest.transformer)?;

        let device = Default::default();
        let stem   = Self::weights_stem(&self.dir, &self.names);
        let record: ClassifierRecord<InferBackend> = WeightsRecorder::new()
            .load(stem.clone(), &device)
            .with_context(|| format!("Cannot load weights '{}'", stem.display()))?;

        // Shapes are checked on the record, before it is loaded into a module
        check_consistency(&manifest, &encoder, &transformer, &record_layer_dims(&record))?;
        let model: Classifier<InferBackend> = manifest.classifier.init(&device).load_record(record);

        tracing::info!(
            "Loaded {} artifacts from '{}': {} classes, {} input features",
            manifest.pipeline,
            self.dir.display(),
            encoder.num_classes(),
            transformer.dim()
        );
        Ok(LoadedArtifacts { encoder, transformer, model, manifest })
    }
}

fn check_consistency(
    manifest:    &Manifest,
    encoder:     &LabelEncoder,
    transformer: &FeatureTransformer,
    stored:      &[(usize, usize)],
) -> Result<()> {
    let arch = &manifest.classifier;

    if transformer.dim() != arch.input_dim {
        bail!(
            "Transformer produces {} features but the classifier expects {}",
            transformer.dim(),
            arch.input_dim
        );
    }
    if encoder.num_classes() != arch.num_classes {
        bail!(
            "Label encoder has {} classes but the classifier outputs {}",
            encoder.num_classes(),
            arch.num_classes
        );
    }
    if stored != arch.layer_dims().as_slice() {
        bail!(
            "Stored weights have layer shapes {:?}, manifest describes {:?}",
            stored,
            arch.layer_dims()
        );
    }
    Ok(())
}

fn remove_dir_if_present(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            Err(e).with_context(|| format!("Cannot remove '{}'", path.display()))
        }
        _ => Ok(()),
    }
}
