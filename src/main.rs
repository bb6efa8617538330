use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use photo_geotag::config::AppConfig;
use photo_geotag::processor::{process_files, CaptureOptions};
use photo_geotag::store::ExifFileStore;
use photo_geotag::{ExifTag, Location, MetadataRecord, Provider};

#[derive(Parser, Debug)]
#[command(name = "photo_geotag", about = "Copy and geotag photo EXIF metadata")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy EXIF tags from an original image onto a processed image's sidecar.
    Transfer {
        original: PathBuf,
        processed: PathBuf,
        /// The processed image is already upright.
        #[arg(long)]
        reset_orientation: bool,
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Fix time in milliseconds since the Unix epoch. Defaults to now.
        #[arg(long)]
        time_ms: Option<i64>,
    },
    /// Print the known EXIF tags of an image.
    Show { image: PathBuf },
}

fn main() -> Result<()> {
    let config = AppConfig::new()?;

    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Transfer {
            original,
            processed,
            reset_orientation,
            lat,
            lon,
            time_ms,
        } => {
            let location = match (lat, lon) {
                (Some(latitude), Some(longitude)) => Some(Location {
                    provider: Provider::Gps,
                    latitude,
                    longitude,
                    timestamp_ms: time_ms.unwrap_or_else(|| chrono::Utc::now().timestamp_millis()),
                }),
                _ => None,
            };
            let options = CaptureOptions {
                reset_orientation: reset_orientation || config.reset_orientation,
                location,
                datestamp_zone: config.datestamp_zone,
            };

            let report = process_files(&config, &original, &processed, &options)?;
            info!(
                "Wrote {} tags (geotagged: {})",
                report.tags_written, report.gps_applied
            );
        }
        Command::Show { image } => {
            let store = ExifFileStore::open(&image)?;
            let record = MetadataRecord::read_from(&store)?;
            for tag in ExifTag::ALL {
                if let Some(value) = record.field(tag) {
                    println!("{:<20} {}", tag.name(), value);
                }
            }
            match record.rotation() {
                Ok(degrees) => println!("{:<20} {}", "Rotation", degrees),
                Err(e) => log::debug!("No rotation: {}", e),
            }
        }
    }

    Ok(())
}
