use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use consumer_insights::config::AppSettings;
use consumer_insights::dashboard;
use consumer_insights::dataset::{DatasetShape, detect_shape, io, preprocess_auto};
use consumer_insights::filters::FilterSpec;
use consumer_insights::queries::{FacetOptions, airbnb, shopping};
use consumer_insights::session::Session;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "consumer-insights",
    version,
    about = "Upload a consumer dataset and explore its dashboard"
)]
pub struct Cli {
    /// Settings file. Defaults to the platform config directory.
    #[arg(long, global = true, env = "CONSUMER_INSIGHTS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn load_settings(&self) -> Result<AppSettings> {
        match &self.config {
            Some(path) => AppSettings::load_from(path),
            None => AppSettings::load(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the detected dataset shape
    Detect {
        /// CSV file to inspect
        file: PathBuf,
    },
    /// Clean a file and save the result
    Clean {
        file: PathBuf,

        /// Output file path. Defaults to `<name>_clean.csv` next to the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a file and print every dashboard panel
    Dashboard {
        file: PathBuf,

        /// Facet filter as `facet=value1,value2`; repeat for several facets
        #[arg(short = 'f', long = "filter", value_name = "FACET=VALUES")]
        filters: Vec<String>,
    },
    /// Print the values available for each filter facet
    Options { file: PathBuf },
    /// Print the schema of the loaded table
    Describe { file: PathBuf },
    /// Run an ad-hoc SQL query against the loaded table
    Sql { file: PathBuf, query: String },
    /// Write the default settings file
    InitConfig,
}

pub fn run_command(command: Commands, settings: AppSettings) -> Result<()> {
    match command {
        Commands::Detect { file } => handle_detect(&file, &settings),
        Commands::Clean { file, output } => handle_clean(&file, output, &settings),
        Commands::Dashboard { file, filters } => handle_dashboard(&file, &filters, settings),
        Commands::Options { file } => handle_options(&file, settings),
        Commands::Describe { file } => handle_describe(&file, settings),
        Commands::Sql { file, query } => handle_sql(&file, &query, settings),
        Commands::InitConfig => {
            let path = settings.save()?;
            println!("Settings written to {}", path.display());
            Ok(())
        }
    }
}

fn handle_detect(file: &Path, settings: &AppSettings) -> Result<()> {
    let df = io::read_csv_path(file, &settings.csv)?;
    println!("{}", detect_shape(&df));
    Ok(())
}

fn handle_clean(file: &Path, output: Option<PathBuf>, settings: &AppSettings) -> Result<()> {
    let raw = io::read_csv_path(file, &settings.csv)?;
    let (rows_before, cols_before) = (raw.height(), raw.width());

    let (mut clean, shape) = preprocess_auto(raw)?;

    let output = match output {
        Some(path) => path,
        None => default_clean_path(file)?,
    };
    io::write_csv(&mut clean, &output)?;

    println!("Shape: {shape}");
    println!(
        "Rows: {rows_before} -> {}, columns: {cols_before} -> {}",
        clean.height(),
        clean.width()
    );
    println!("Written to {}", output.display());
    Ok(())
}

fn handle_dashboard(file: &Path, raw_filters: &[String], settings: AppSettings) -> Result<()> {
    let session = load_session(file, settings)?;
    let shape = session.shape();
    if !shape.is_known() {
        println!(
            "Dataset not recognised. \
             Upload a Customer Shopping Behavior or Airbnb Open Data export."
        );
        return Ok(());
    }

    let pairs = parse_filters(raw_filters)?;
    let filters = FilterSpec::from_pairs(shape, &pairs)?;
    let predicate = filters.predicate();
    if !predicate.is_empty() {
        println!("Filter: {predicate}");
    }

    let Some(dashboard) = dashboard::build(&session, &filters)? else {
        return Ok(());
    };

    println!("{}", dashboard.title);
    for panel in &dashboard.panels {
        println!("\n{} ({})", panel.title, panel.kind);
        println!("{}", panel.data);
    }
    Ok(())
}

fn handle_options(file: &Path, settings: AppSettings) -> Result<()> {
    let session = load_session(file, settings)?;
    let options = match session.shape() {
        DatasetShape::Shopping => shopping::filter_options(session.store())?,
        DatasetShape::Airbnb => airbnb::filter_options(session.store())?,
        DatasetShape::Unknown => anyhow::bail!("Dataset not recognised; no filters available"),
    };

    for FacetOptions { facet, values } in options {
        println!("{facet}: {}", values.join(", "));
    }
    Ok(())
}

fn handle_describe(file: &Path, settings: AppSettings) -> Result<()> {
    let session = load_session(file, settings)?;
    let table = session
        .shape()
        .table_name()
        .context("Dataset not recognised; nothing was loaded into the store")?;

    println!("{}", session.store().describe(table)?);
    Ok(())
}

fn handle_sql(file: &Path, query: &str, settings: AppSettings) -> Result<()> {
    let session = load_session(file, settings)?;
    println!("{}", session.store().query(query)?);
    Ok(())
}

fn load_session(file: &Path, settings: AppSettings) -> Result<Session> {
    let mut session = Session::new(settings);
    let dataset = session
        .upload_path(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    println!(
        "Loaded {} ({}): {} rows, {} columns",
        file.display(),
        dataset.shape,
        dataset.rows,
        dataset.columns.len()
    );
    Ok(session)
}

/// Split `facet=a,b` arguments into `(facet, value)` pairs
fn parse_filters(raw: &[String]) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for arg in raw {
        let (facet, values) = arg
            .split_once('=')
            .with_context(|| format!("Filter '{arg}' must look like facet=value1,value2"))?;
        for value in values.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            pairs.push((facet.trim().to_owned(), value.to_owned()));
        }
    }
    Ok(pairs)
}

fn default_clean_path(file: &Path) -> Result<PathBuf> {
    let stem = file
        .file_stem()
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?
        .to_string_lossy();
    Ok(file.with_file_name(format!("{stem}_clean.csv")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filters() -> Result<()> {
        let pairs = parse_filters(&[
            "category=Clothing, Footwear".to_owned(),
            "price_min=10".to_owned(),
        ])?;
        assert_eq!(
            pairs,
            vec![
                ("category".to_owned(), "Clothing".to_owned()),
                ("category".to_owned(), "Footwear".to_owned()),
                ("price_min".to_owned(), "10".to_owned()),
            ]
        );
        assert!(parse_filters(&["category".to_owned()]).is_err());
        Ok(())
    }

    #[test]
    fn test_default_clean_path() -> Result<()> {
        assert_eq!(
            default_clean_path(Path::new("data/airbnb.csv"))?,
            PathBuf::from("data/airbnb_clean.csv")
        );
        Ok(())
    }

    #[test]
    fn test_cli_parses_repeated_filters() {
        let cli = Cli::parse_from([
            "consumer-insights",
            "dashboard",
            "shop.csv",
            "-f",
            "season=Winter",
            "--filter",
            "gender=Female",
        ]);
        match cli.command {
            Commands::Dashboard { filters, .. } => assert_eq!(filters.len(), 2),
            _ => panic!("expected dashboard command"),
        }
    }
}
