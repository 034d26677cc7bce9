use clap::{ArgGroup, Parser};
use log::info;
use platescope::{init_logging, open_session};
use platescope_core::aggregate::{self, Grouping, CELL_COUNT_COLUMN};
use platescope_core::locator::{locate_plate_table, LocatorConfig};
use platescope_core::object::ObjectRef;
use platescope_core::reader::{key_values, metric_values, read_columns};
use platescope_render::{render_to_file, show_figure, Figure, Panel};
use std::error::Error;
use std::path::PathBuf;
use std::process;

const POLAR_BINS: usize = 36;

#[derive(Parser)]
#[command(
    name = "platescope",
    version,
    about = "Plot measurement tables attached to a plate on a remote data server",
    group(ArgGroup::new("auth").required(true))
)]
struct Cli {
    /// Server hostname
    #[arg(short = 's', long)]
    server: String,
    /// Server port
    #[arg(short = 'p', long, default_value_t = protocol::DEFAULT_PORT)]
    port: u16,
    /// Username; a password is prompted for
    #[arg(short = 'u', long, group = "auth")]
    username: Option<String>,
    /// Key of an existing session to join
    #[arg(short = 'k', long = "session_key", group = "auth")]
    session_key: Option<String>,
    /// Log progress
    #[arg(short = 'v', long)]
    verbose: bool,
    /// Log remote calls
    #[arg(short = 'd', long)]
    debug: bool,
    /// Column holding the group identifiers
    #[arg(long = "group_by", default_value = "Well")]
    group_by: String,
    /// Add a bar panel counting rows per group
    #[arg(long = "cell_count")]
    cell_count: bool,
    /// Column to average into a bar panel; repeatable
    #[arg(long)]
    histogram: Vec<String>,
    /// Angle column in degrees to average into a polar panel; repeatable
    #[arg(long)]
    polar: Vec<String>,
    /// List the table's columns and exit
    #[arg(short = 'l', long)]
    list: bool,
    /// Write the figure to a PNG or SVG file instead of opening a window
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,
    /// Object to plot, as Kind:Id; only Plate is supported
    object: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    let object: ObjectRef = cli.object.parse()?;
    let mut session = open_session(
        &cli.server,
        Some(cli.port),
        cli.username.as_deref(),
        cli.session_key.as_deref(),
    )?;

    let config = LocatorConfig::default();
    let mut plate = locate_plate_table(&mut session, &object, &config)?;

    if cli.list {
        for header in plate.table.headers() {
            println!("{} ({})", header.name, header.kind.as_str());
        }
        drop(plate);
        session.close()?;
        return Ok(());
    }

    // (metric name, polar) in panel order: histograms, polars, cell count.
    let mut metrics: Vec<(String, bool)> = Vec::new();
    for name in &cli.histogram {
        metrics.push((name.clone(), false));
    }
    for name in &cli.polar {
        metrics.push((name.clone(), true));
    }
    if cli.cell_count {
        metrics.push((CELL_COUNT_COLUMN.to_string(), false));
    }
    if metrics.is_empty() {
        return Err(
            "nothing to plot: pass --histogram, --polar, or --cell_count (or --list to inspect columns)"
                .into(),
        );
    }

    let rows = plate.table.row_count();
    let key_column = read_columns(&mut plate.table, &plate.columns, &[cli.group_by.as_str()], 0, rows)?;
    let keys = key_values(&key_column[0])?;
    let group_by_well = cli.group_by == "Well";

    let mut panels = Vec::with_capacity(metrics.len());
    for (name, is_polar) in &metrics {
        let pairs: Vec<(i64, f64)> = if name.as_str() == CELL_COUNT_COLUMN {
            Grouping::from_keys(&keys)
                .counts()
                .into_iter()
                .map(|(key, count)| (key, count as f64))
                .collect()
        } else {
            let data = read_columns(&mut plate.table, &plate.columns, &[name.as_str()], 0, rows)?;
            let values = metric_values(&data[0])?;
            Grouping::from_rows(&keys, &values)?.mean()
        };

        let groups = if group_by_well {
            let labels = &plate.labels;
            aggregate::labelled_sorted(pairs, |key| labels.get(key).map(str::to_string))?
        } else {
            aggregate::numeric_labels(pairs)
        };
        info!("'{name}': {} groups", groups.len());

        let title = if name.as_str() == CELL_COUNT_COLUMN {
            "Cell Count".to_string()
        } else {
            name.clone()
        };
        if *is_polar {
            let means: Vec<f64> = groups.iter().map(|(_, value)| *value).collect();
            let radians = aggregate::degrees_to_radians(&means);
            let mirrored = aggregate::mirror_angles(&radians);
            let bins = aggregate::polar_histogram(&mirrored, POLAR_BINS);
            panels.push(Panel::Rose { title, bins });
        } else {
            let (labels, heights): (Vec<String>, Vec<f64>) = groups.into_iter().unzip();
            panels.push(Panel::Bars {
                title,
                labels,
                heights,
            });
        }
    }

    let plate_name = plate.plate_name.clone();
    drop(plate);
    session.close()?;

    let figure = Figure::new(panels)?;
    match &cli.out {
        Some(path) => {
            render_to_file(&figure, path)?;
            info!("figure written to {}", path.display());
        }
        None => show_figure(&format!("platescope - {plate_name}"), &figure)?,
    }
    Ok(())
}
