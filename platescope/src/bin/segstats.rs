use clap::{ArgGroup, Parser};
use log::info;
use platescope::{init_logging, open_session};
use platescope_core::aggregate::{self, Grouping, CELL_COUNT_COLUMN};
use platescope_core::locator::{locate_plate_table, LocatorConfig};
use platescope_core::object::ObjectRef;
use platescope_core::reader::{key_values, metric_values, read_columns, read_matching};
use platescope_render::{render_to_file, show_figure, Figure, Panel};
use protocol::{ColumnKind, KeyValue};
use std::error::Error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "segstats",
    version,
    about = "Per-image cell segmentation statistics from a plate results table",
    group(ArgGroup::new("auth").required(true))
)]
struct Cli {
    /// Server hostname
    #[arg(short = 's', long)]
    server: String,
    /// Server port; the standard port is used when omitted
    #[arg(short = 'p', long)]
    port: Option<u16>,
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
    /// Write the cell-count figure to a PNG or SVG file instead of opening a window
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,
    /// Object to analyze, as Kind:Id; only Plate is supported
    object: String,
}

struct ImageStats {
    id: i64,
    cells: usize,
    means: Vec<f64>,
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
        cli.port,
        cli.username.as_deref(),
        cli.session_key.as_deref(),
    )?;

    let config = LocatorConfig::default();
    let mut plate = locate_plate_table(&mut session, &object, &config)?;

    let rows = plate.table.row_count();
    let image_column = read_columns(&mut plate.table, &plate.columns, &[CELL_COUNT_COLUMN], 0, rows)?;
    let image_ids = key_values(&image_column[0])?;
    let mut ids = Grouping::from_keys(&image_ids).keys().to_vec();
    ids.sort_unstable();
    info!("{} images, {rows} segmented cells in total", ids.len());

    let metric_names: Vec<String> = plate
        .table
        .headers()
        .iter()
        .filter(|header| header.kind == ColumnKind::Float64)
        .map(|header| header.name.clone())
        .collect();
    let mut requested: Vec<&str> = vec![CELL_COUNT_COLUMN];
    requested.extend(metric_names.iter().map(String::as_str));

    // One predicate read per image id.
    let mut stats = Vec::with_capacity(ids.len());
    for &id in &ids {
        let data = read_matching(
            &mut plate.table,
            &plate.columns,
            &requested,
            CELL_COUNT_COLUMN,
            KeyValue::Int(id),
        )?;
        let cells = data[0].len();
        let mut means = Vec::with_capacity(metric_names.len());
        for column in &data[1..] {
            let values = metric_values(column)?;
            let mean = if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };
            means.push(mean);
        }
        stats.push(ImageStats { id, cells, means });
    }

    print_report(&metric_names, &stats);

    let pairs: Vec<(i64, f64)> = stats.iter().map(|s| (s.id, s.cells as f64)).collect();
    let groups = aggregate::numeric_labels(pairs);
    let (labels, heights): (Vec<String>, Vec<f64>) = groups.into_iter().unzip();

    let plate_name = plate.plate_name.clone();
    drop(plate);
    session.close()?;

    let figure = Figure::new(vec![Panel::Bars {
        title: "Cells per Image".to_string(),
        labels,
        heights,
    }])?;
    match &cli.out {
        Some(path) => {
            render_to_file(&figure, path)?;
            info!("figure written to {}", path.display());
        }
        None => show_figure(&format!("segstats - {plate_name}"), &figure)?,
    }
    Ok(())
}

fn print_report(metric_names: &[String], stats: &[ImageStats]) {
    let width = metric_names
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(12);

    let mut header = format!("{:>10}  {:>8}", "Image", "Cells");
    for name in metric_names {
        header.push_str(&format!("  {name:>width$}"));
    }
    println!("{header}");

    for entry in stats {
        let mut line = format!("{:>10}  {:>8}", entry.id, entry.cells);
        for mean in &entry.means {
            line.push_str(&format!("  {mean:>width$.3}"));
        }
        println!("{line}");
    }
}
