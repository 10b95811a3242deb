mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use outfit_advisor::{
    format_conditions, format_float, format_percent, recommend, Category, Condition,
    ConditionFlags, Engine, EngineConfig, ForecastPeriod, Recommendation, TemperatureBand,
};
use outfit_advisor::forecast::{check_wind_speed, ForecastSummary, TemperatureClassifier};

#[derive(Parser)]
#[command(name = "outfit-advisor", about = "Weather-driven outfit recommender")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    Recommend(RecommendArgs),
    Catalog(CatalogArgs),
    Bands,
    InitConfig(InitConfigArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct RecommendArgs {
    #[arg(long, default_value = "Casual")]
    category: String,
    #[arg(long, conflicts_with = "band")]
    temp: Option<f64>,
    #[arg(long, default_value = "F")]
    unit: String,
    #[arg(long, default_value = "")]
    forecast: String,
    #[arg(long, default_value = "")]
    details: String,
    #[arg(long)]
    band: Option<String>,
    #[arg(long = "condition")]
    conditions: Vec<String>,
    #[arg(long, default_value_t = 0.0)]
    wind: f64,
    #[arg(long, default_value_t = 0.0)]
    precip: f64,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct CatalogArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    check: bool,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(default_value = "config/outfit.toml")]
    path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, _) = EngineConfig::load(cli.config).map_err(|err| err.to_string())?;

    match cli.command {
        Some(Command::InitConfig(args)) => run_init_config(&args.path),
        Some(Command::Bands) => {
            run_bands(&config);
            Ok(())
        }
        Some(Command::Catalog(args)) => run_catalog(build_engine(config)?, args),
        Some(Command::Recommend(args)) => run_recommend(build_engine(config)?, args),
        Some(Command::Serve(args)) => server::serve(build_engine(config)?, args).await,
        None => Err("missing command: try `outfit-advisor recommend --help`".to_string()),
    }
}

fn build_engine(config: EngineConfig) -> Result<Engine, String> {
    Engine::from_config(config).map_err(|err| err.to_string())
}

fn run_recommend(engine: Engine, args: RecommendArgs) -> Result<(), String> {
    let category = Category::from_str(&args.category).map_err(|err| err.to_string())?;
    let forecast = build_forecast(&engine, &args)?;

    let output = recommend(&engine, forecast, category);
    if args.json {
        let payload = serde_json::to_string_pretty(&output)
            .map_err(|err| format!("failed to serialize recommendation: {}", err))?;
        println!("{}", payload);
        return Ok(());
    }

    print_recommendation(&output);
    Ok(())
}

fn build_forecast(engine: &Engine, args: &RecommendArgs) -> Result<ForecastSummary, String> {
    let wind = check_wind_speed(args.wind).map_err(|err| err.to_string())?;

    if let Some(band) = args.band.as_deref() {
        let band = TemperatureBand::from_str(band).map_err(|err| err.to_string())?;
        let flags = parse_conditions(&args.conditions)?;
        Ok(engine.processor().simulate(band, flags, wind, args.precip))
    } else if let Some(temperature) = args.temp {
        let period = ForecastPeriod {
            short_forecast: args.forecast.clone(),
            detailed_forecast: args.details.clone(),
            temperature,
            temperature_unit: args.unit.clone(),
            apparent_temperature_c: None,
            wind_speed: format!("{} mph", wind),
            precipitation_probability: Some(args.precip),
        };
        engine
            .processor()
            .summarize(&period)
            .map_err(|err| err.to_string())
    } else {
        Err("pass --temp for a forecast or --band to simulate one".to_string())
    }
}

fn parse_conditions(values: &[String]) -> Result<ConditionFlags, String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .filter(|value| !value.trim().is_empty())
        .map(|value| Condition::from_str(value).map_err(|err| err.to_string()))
        .collect()
}

fn print_recommendation(output: &Recommendation) {
    let forecast = &output.forecast;
    match (forecast.temperature, forecast.temperature_unit) {
        (Some(temperature), Some(unit)) => println!(
            "Temperature: {}°{} ({})",
            format_float(temperature, 0),
            unit.symbol(),
            forecast.temperature_band
        ),
        _ => println!("Temperature band: {}", forecast.temperature_band),
    }
    if let (Some(feels_like), Some(unit)) = (forecast.feels_like, forecast.temperature_unit) {
        println!("Feels like: {}°{}", format_float(feels_like, 0), unit.symbol());
    }
    println!(
        "Conditions: {} (primary: {})",
        format_conditions(&forecast.conditions),
        output.primary_condition
    );
    println!(
        "Wind: {} mph | precipitation: {}{}",
        format_float(forecast.wind_speed_mph, 0),
        format_percent(forecast.precipitation_probability.unwrap_or(0.0)),
        if forecast.is_heavy_precipitation { " (heavy)" } else { "" }
    );
    println!("Category: {}", output.category);

    let selection = &output.selection;
    match selection.prominent() {
        Some(entry) => println!("\nWear: {}", entry.item.name),
        None => println!("\nNo jacket needed"),
    }

    for group in &selection.grouped_items {
        println!("\n{}:", group.name);
        for entry in &group.items {
            println!("- {} ({})", entry.item.name, entry.key);
        }
    }

    if !selection.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &selection.warnings {
            println!("- {}", warning);
        }
    }
}

fn run_catalog(engine: Engine, args: CatalogArgs) -> Result<(), String> {
    let category = args
        .category
        .as_deref()
        .map(Category::from_str)
        .transpose()
        .map_err(|err| err.to_string())?;

    if args.check {
        let catalog = engine.catalog();
        let unmapped = catalog.unmapped_types(&engine.config().display);
        let unknown = catalog.unknown_special_conditions();
        for garment_type in &unmapped {
            println!("unmapped type: {}", garment_type);
        }
        for (id, keyword) in &unknown {
            println!("unknown special condition on {}: {}", id, keyword);
        }
        if unmapped.is_empty() && unknown.is_empty() {
            println!("catalog ok: {} items", catalog.len());
        }
        return Ok(());
    }

    for (id, item) in engine.catalog().iter() {
        if category.is_some_and(|category| !item.fits_category(category)) {
            continue;
        }
        let bands: Vec<&str> = item.temp_bands.iter().map(|band| band.label()).collect();
        println!(
            "{:<34} {:<10} {:<6} thermal {} | {}",
            id,
            item.garment_type,
            item.layer.label(),
            item.thermal_value,
            bands.join(", ")
        );
    }
    Ok(())
}

fn run_bands(config: &EngineConfig) {
    let classifier = TemperatureClassifier::new(config.bands.clone());
    for rule in classifier.rules() {
        let bound = |value: Option<f64>| {
            value
                .map(|celsius| format!("{}°C", format_float(celsius, 1)))
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "{:<10} min {:>7}  max {:>7}",
            rule.band.label(),
            bound(rule.min_c),
            bound(rule.max_c)
        );
    }
    println!("default: {}", classifier.default_band());
}

fn run_init_config(path: &Path) -> Result<(), String> {
    EngineConfig::default()
        .write(path)
        .map_err(|err| err.to_string())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
