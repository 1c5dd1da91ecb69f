use clap::Parser;
use delivery_dates::config::Config;
use delivery_dates::format;
use delivery_dates::store::{self, JsonFileStore, StoreSettings};
use env_logger::Env;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "delivery-dates",
    about = "Parse delivery-date messages (\"Москва с 9.02 (кроме 16)\") into per-city records"
)]
struct Cli {
    /// Message file(s); reads stdin when empty or "-"
    inputs: Vec<PathBuf>,

    /// Print the records as JSON instead of the preview
    #[arg(long)]
    json: bool,

    /// Write the records to this JSON table
    #[arg(long)]
    store: Option<PathBuf>,

    /// Write the records to the store named by DELIVERY_STORE_URL / DELIVERY_STORE_KEY
    #[arg(long, conflicts_with = "store")]
    commit: bool,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn die(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn load_config(path: &PathBuf) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|e| die(&format!("cannot read config: {}", e)));
    serde_json::from_str(&text).unwrap_or_else(|e| die(&format!("invalid config JSON: {}", e)))
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = if let Some(ref config_path) = cli.config {
        load_config(config_path)
    } else {
        let defaults = ["delivery-dates.config.json", "config/delivery-dates.config.json"];
        let mut loaded = None;
        for p in &defaults {
            let path = PathBuf::from(p);
            if path.is_file() {
                info!("using config {}", path.display());
                loaded = Some(load_config(&path));
                break;
            }
        }
        loaded.unwrap_or_default()
    };

    // Open the store before parsing so bad credentials fail fast
    let mut target: Option<JsonFileStore> = if let Some(ref path) = cli.store {
        Some(JsonFileStore::open(path).unwrap_or_else(|e| die(&e.to_string())))
    } else if cli.commit {
        let settings = StoreSettings::from_env().unwrap_or_else(|e| die(&e.to_string()));
        Some(settings.open().unwrap_or_else(|e| die(&e.to_string())))
    } else {
        None
    };

    let bytes = delivery_dates::read_inputs(&cli.inputs).unwrap_or_else(|e| die(&format!("{}", e)));
    let batch = delivery_dates::batch::parse_bytes(&bytes, &config);

    if batch.is_empty() {
        eprintln!("{}", format::NOTHING_UNDERSTOOD_MESSAGE);
        process::exit(1);
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&batch.records)
            .unwrap_or_else(|e| die(&format!("cannot encode records: {}", e)));
        println!("{}", json);
    } else {
        print!("{}", format::format_preview(&batch.records));
    }
    if let Some(warning) = format::format_recognition_warning(&batch) {
        eprintln!("{}", warning);
    }

    if let Some(ref mut target) = target {
        let report = store::update_delivery_dates(target, &batch.records);
        println!();
        println!("{}", format::format_report(&report, config.report_limit));
        if !report.failed.is_empty() {
            process::exit(2);
        }
    }
}
