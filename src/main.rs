use clap::Parser;
use lloyd_kmeans::config::DemoConfig;
use lloyd_kmeans::dump::write_f32_dump;
use lloyd_kmeans::timer::ScopedTimer;
use lloyd_kmeans::utils::generate_circle_clusters;
use lloyd_kmeans::{Dataset, InitMethod, KMeansClustering};
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "lloyd-kmeans", about = "Cluster synthetic circle data with K-means")]
struct Args {
    /// YAML run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of clusters
    #[arg(short, long)]
    k: Option<usize>,

    /// Initialization method: `random` or `kmeans++`
    #[arg(long)]
    init: Option<String>,

    #[arg(long)]
    max_iter: Option<usize>,

    /// Seed for both data generation and clustering
    #[arg(long)]
    seed: Option<u64>,

    /// Stop once centroids move less than the configured tolerance
    #[arg(long)]
    early_stop: bool,

    /// Directory for the data and centroid dumps
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> lloyd_kmeans::Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            DemoConfig::from_file(path)?
        }
        None => DemoConfig::default(),
    };

    if let Some(k) = args.k {
        config.kmeans.n_clusters = k;
    }
    if let Some(name) = &args.init {
        config.kmeans.init = name.parse::<InitMethod>()?;
    }
    if let Some(max_iter) = args.max_iter {
        config.kmeans.max_iter = max_iter;
    }
    if let Some(seed) = args.seed {
        config.data.seed = seed;
        config.kmeans.seed = Some(seed);
    }
    if args.early_stop {
        config.kmeans.early_stop = true;
    }
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }

    let data = &config.data;
    info!(
        "Generating {} points in {} dims around {} categories",
        data.n_points, data.n_dims, data.n_categories
    );
    let points = generate_circle_clusters(
        data.n_points,
        data.n_dims,
        data.n_categories,
        data.deviation,
        data.seed,
    )?;
    let dataset = Dataset::from_array(points)?;

    let mut clf = KMeansClustering::new(config.kmeans.clone());
    let report = {
        let _timer = ScopedTimer::new("KMeans fit");
        clf.fit(dataset.as_slice(), dataset.n_points(), dataset.n_dims())?
    };
    info!(
        "Ran {} iterations ({} empty-cluster events)",
        report.iterations,
        report.empty_clusters.len()
    );

    write_f32_dump(config.data_path(), dataset.as_slice())?;
    write_f32_dump(config.centroid_path(), clf.centroid_buffer()?)?;
    info!(
        "Wrote {:?} and {:?}",
        config.data_path(),
        config.centroid_path()
    );

    info!("Code finished without any errors");
    Ok(())
}
