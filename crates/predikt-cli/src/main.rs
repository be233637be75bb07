use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use predikt_classifiers::Predictor;
use predikt_cli::serve::input::ServeConfig;
use predikt_cli::serve::routes::PredictResponse;
use predikt_cli::serve::server::run_server;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("PREDIKT_LOG", "error,predikt=info,actix_web=info"))
        .init();

    let matches = Command::new("predikt")
        .version(clap::crate_version!())
        .about("Serve predictions from a pre-trained classifier")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            model_args(Command::new("serve").about("Load the model and serve POST /predict over HTTP"))
                .arg(
                    Arg::new("host")
                        .long("host")
                        .help("Interface to bind. Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Hostname),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .help("Port to bind. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(
                    Arg::new("workers")
                        .short('w')
                        .long("workers")
                        .help("Number of HTTP worker threads (0 = one per CPU).")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            model_args(Command::new("predict").about("Load the model and predict a single feature vector"))
                .arg(
                    Arg::new("features")
                        .short('f')
                        .long("features")
                        .help("Comma separated feature values, e.g. 5.1,3.5,1.4,0.2")
                        .required(true)
                        .num_args(1..)
                        .value_delimiter(',')
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
        .subcommand(model_args(
            Command::new("inspect").about("Load the model and print its metadata as JSON"),
        ))
        .get_matches();

    match matches.subcommand() {
        Some(("serve", sub_m)) => handle_serve(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("inspect", sub_m)) => handle_inspect(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

/// Arguments shared by every subcommand that loads a model.
fn model_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("config")
            .help("Path to the JSON configuration file")
            .required(false)
            .value_parser(clap::value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath),
    )
    .arg(
        Arg::new("model_path")
            .short('m')
            .long("model")
            .help("Path to the model artifact. Overrides the configuration file.")
            .value_parser(clap::value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath),
    )
    .arg(
        Arg::new("format")
            .long("format")
            .help("Model artifact format. Overrides the configuration file.")
            .value_parser(["random_forest", "gbdt"]),
    )
    .arg(
        Arg::new("n_features")
            .short('n')
            .long("n-features")
            .help("Feature count the model was trained on. Overrides the configuration file.")
            .value_parser(clap::value_parser!(usize)),
    )
}

fn resolve(matches: &ArgMatches) -> Result<(ServeConfig, Predictor)> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    if let Some(path) = config_path {
        log::info!("[Predikt::Config] Using config: {:?}", path);
    }
    let config = ServeConfig::from_arguments(config_path, matches)?;

    match Predictor::from_config(&config.model) {
        Ok(predictor) => Ok((config, predictor)),
        Err(e) => {
            log::error!("Failed to load model: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_serve(matches: &ArgMatches) -> Result<()> {
    let (config, predictor) = resolve(matches)?;

    let result = actix_web::rt::System::new().block_on(run_server(config, predictor));
    match result {
        Ok(_) => {
            log::info!("[Predikt::Serve] Server stopped.");
            Ok(())
        }
        Err(e) => {
            log::error!("Server failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let (_, predictor) = resolve(matches)?;
    let features: Vec<f64> = matches
        .get_many::<f64>("features")
        .map(|vals| vals.copied().collect())
        .unwrap_or_default();

    match predictor.predict_one(&features) {
        Ok(prediction) => {
            println!("{}", serde_json::to_string(&PredictResponse { prediction })?);
            Ok(())
        }
        Err(e) => {
            log::error!("Prediction failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(2)
        }
    }
}

fn handle_inspect(matches: &ArgMatches) -> Result<()> {
    let (_, predictor) = resolve(matches)?;
    println!("{}", serde_json::to_string_pretty(&predictor.info())?);
    Ok(())
}
