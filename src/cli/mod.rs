// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All real work is delegated to the application and server
// layers.
//
//   1. `train`   - fit a pipeline on a CSV file, write artifacts
//   2. `serve`   - load artifacts, expose the HTTP endpoint
//   3. `predict` - load artifacts, classify one input, print it
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, ServeArgs, TrainArgs};
use serde_json::json;

use crate::application::predict_use_case::Predictor;
use crate::domain::pipeline::PipelineKind;
use crate::server::handlers::coerce_input;

#[derive(Parser, Debug)]
#[command(
    name = "mindcheck",
    version,
    about = "Train and serve small emotion and anxiety-level classifiers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Serve(args)   => run_serve(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    let report = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Trained {} pipeline on {} examples ({} train / {} validation).",
        report.pipeline, report.examples, report.train_size, report.val_size
    );
    println!("Classes: {}", report.classes.join(", "));
    if let Some(last) = &report.final_epoch {
        println!(
            "Final epoch {}: train_acc={:.1}% val_acc={:.1}%",
            last.epoch,
            last.train_acc * 100.0,
            last.val_acc * 100.0
        );
    }
    println!("Artifacts written to '{}'.", report.artifact_dir.display());
    Ok(())
}

fn run_serve(args: ServeArgs) -> Result<()> {
    let config: crate::server::ServeConfig = args.into();
    tracing::info!("Starting {} server", config.pipeline);
    crate::server::run(&config)
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let kind: PipelineKind = args.pipeline.into();
    let predictor = Predictor::from_dir(&args.artifact_dir, kind, args.oov.into())?;

    // Same coercion as an HTTP body carrying the input field
    let body       = json!({ predictor.spec().input_field: args.input });
    let raw        = coerce_input(predictor.spec(), &body)?;
    let prediction = predictor.predict(&raw)?;

    println!("{} ({:.1}%)", prediction.label, prediction.confidence * 100.0);
    Ok(())
}
