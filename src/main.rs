//! `lbpdemo`: train texture models and classify images against them.
//!
//! ```text
//! lbpdemo -t <modelfile> <imagefile>...
//! lbpdemo -c <modelfile>... <imagefile>
//! ```
use clap::{ArgGroup, Parser};
use lbp_texture::config::{load_config, ToolConfig};
use lbp_texture::image::io::write_json_file;
use lbp_texture::{LbpModel, LbpParameters, Result};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "lbpdemo")]
#[command(author, version, about = "Local binary pattern texture classifier", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["train", "classify"])))]
struct Cli {
    /// Train: model file to write, followed by the training images
    #[arg(short = 't', long, num_args = 2.., value_names = ["MODELFILE", "IMAGEFILE"])]
    train: Option<Vec<PathBuf>>,

    /// Classify: candidate model files, followed by the image to classify
    #[arg(short = 'c', long, num_args = 2.., value_names = ["MODELFILE", "IMAGEFILE"])]
    classify: Option<Vec<PathBuf>>,

    /// Training resolutions as "p/r/b:p/r/b:..." (overrides the config file)
    #[arg(long, value_name = "P/R/B")]
    params: Option<LbpParameters>,

    /// JSON tool configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a JSON classification report
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ToolConfig::default(),
    };

    if let Some(files) = &cli.train {
        let (model_file, images) = files.split_first().ok_or_else(usage)?;
        let params = cli.params.clone().unwrap_or(config.parameters);
        train(model_file, images, params)
    } else if let Some(files) = &cli.classify {
        let (image_file, model_files) = files.split_last().ok_or_else(usage)?;
        let report_path = cli.report.clone().or(config.report_json);
        classify(model_files, image_file, report_path.as_deref())
    } else {
        Err(usage())
    }
}

fn usage() -> lbp_texture::LbpError {
    std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        "Usage: lbpdemo -t modelfile imagefiles | lbpdemo -c modelfiles imagefile",
    )
    .into()
}

fn train(model_file: &Path, images: &[PathBuf], params: LbpParameters) -> Result<()> {
    info!(
        "training {} from {} images with {}",
        model_file.display(),
        images.len(),
        params
    );
    let model = LbpModel::from_files(params, images)?;
    model.save(model_file)?;
    println!(
        "Saved model {} ({} images, resolutions {})",
        model_file.display(),
        model.image_count(),
        model.parameters()
    );
    Ok(())
}

fn classify(model_files: &[PathBuf], image_file: &Path, report: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    let models = model_files
        .iter()
        .map(|path| LbpModel::load(path))
        .collect::<Result<Vec<_>>>()?;
    // The sample is built with the first candidate's resolutions.
    let params = models
        .first()
        .map(|m| m.parameters().clone())
        .ok_or(lbp_texture::LbpError::NoCandidates)?;
    let sample = LbpModel::from_file(params, image_file)?;
    let result = sample.score_candidates(&models)?;

    for (path, score) in model_files.iter().zip(&result.scores) {
        println!("{}: {}", display_name(path), score);
    }
    let best = display_name(&model_files[result.best]);
    println!("Classified as {best}");

    if let Some(path) = report {
        let summary = ClassificationReport {
            image: image_file.to_path_buf(),
            scores: model_files
                .iter()
                .zip(&result.scores)
                .map(|(model, &score)| ModelScore {
                    model: model.clone(),
                    score,
                })
                .collect(),
            best,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        write_json_file(path, &summary)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelScore {
    model: PathBuf,
    score: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassificationReport {
    image: PathBuf,
    scores: Vec<ModelScore>,
    best: String,
    elapsed_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::error::Error> {
        Cli::try_parse_from(std::iter::once("lbpdemo").chain(args.iter().copied()))
    }

    #[test]
    fn train_takes_model_then_images() {
        let cli = parse(&["-t", "wood.lbp", "a.png", "b.png"]).unwrap();
        let files = cli.train.unwrap();
        assert_eq!(files[0], PathBuf::from("wood.lbp"));
        assert_eq!(files.len(), 3);
        assert!(cli.classify.is_none());
    }

    #[test]
    fn classify_takes_models_then_image() {
        let cli = parse(&["-c", "a.lbp", "b.lbp", "sample.png"]).unwrap();
        let files = cli.classify.unwrap();
        assert_eq!(files.last(), Some(&PathBuf::from("sample.png")));
    }

    #[test]
    fn usage_errors_are_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["-t", "only-model.lbp"]).is_err());
        assert!(parse(&["-t", "m.lbp", "a.png", "-c", "m.lbp", "a.png"]).is_err());
        assert!(parse(&["--params", "8/1", "-t", "m.lbp", "a.png"]).is_err());
    }

    #[test]
    fn params_option_is_canonicalized() {
        let cli = parse(&["--params", "8/1/0:16/2/4", "-t", "m.lbp", "a.png"]).unwrap();
        assert_eq!(cli.params.unwrap().to_string(), "16/2/4:8/1/0");
    }
}
