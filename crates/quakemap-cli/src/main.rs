use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quakemap_client::EarthquakeClient;
use quakemap_core::{load_app_config, split_at_antimeridian, EarthquakeRecord, GeoPoint, Ring};

#[derive(Debug, Parser)]
#[command(name = "quakemap")]
#[command(about = "Seismic event map explorer, terminal edition")]
struct Cli {
    /// Print raw JSON instead of formatted lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List stored events, newest first.
    List {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        min_magnitude: Option<f64>,
    },
    /// List the most recent events.
    Recent {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        min_magnitude: Option<f64>,
    },
    /// Ask the backend to pull fresh data from its upstream feed.
    Sync,
    /// Search within a radius of a point (storage-space coordinates).
    Radius {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        #[arg(long)]
        radius_km: Option<f64>,
    },
    /// Search inside a polygon given as repeated `--vertex lat,lon`
    /// pairs in drawing order. A polygon crossing the 180° meridian is
    /// repaired or split automatically.
    Region {
        #[arg(long = "vertex", value_parser = parse_vertex, required = true)]
        vertices: Vec<GeoPoint>,
    },
    /// Show aggregate statistics.
    Stats,
    /// Show boundary statistics (centroid, envelope, hull) for a set of
    /// event ids.
    Boundary {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    let client = EarthquakeClient::new(&config).context("building backend client")?;

    match cli.command {
        Commands::List { limit, min_magnitude } => {
            let records = client
                .list(limit.unwrap_or(config.default_limit), min_magnitude)
                .await?;
            print_records(&records, cli.json)?;
        }
        Commands::Recent { limit, min_magnitude } => {
            let records = client
                .recent(limit.unwrap_or(config.default_limit), min_magnitude)
                .await?;
            print_records(&records, cli.json)?;
        }
        Commands::Sync => {
            let response = client.sync().await?;
            println!("{}", response.message);
            if let Some(total) = response.total_received {
                println!("total received: {total}");
            }
        }
        Commands::Radius { lat, lon, radius_km } => {
            let center = GeoPoint::new(lat, lon)?;
            let request = quakemap_core::RadiusSearchRequest {
                latitude: center.lat,
                longitude: center.lon,
                radius_km: radius_km.unwrap_or(config.default_radius_km),
            };
            let records = client.search_radius(&request).await?;
            print_records(&records, cli.json)?;
        }
        Commands::Region { vertices } => {
            let ring = Ring::new(vertices)?;
            let geometry = split_at_antimeridian(&ring);
            let rings = geometry.rings();
            if rings.len() > 1 {
                tracing::info!("polygon crosses the antimeridian; searching both halves");
            }
            let mut merged: Vec<EarthquakeRecord> = Vec::new();
            for ring in rings {
                let records = client.search_region(ring).await?;
                merge_records(&mut merged, records);
            }
            print_records(&merged, cli.json)?;
        }
        Commands::Stats => {
            let stats = client.stats().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("total events:   {}", stats.total_earthquakes);
                println!("last 24 hours:  {}", stats.recent_24h);
                println!(
                    "magnitude:      avg {:.1}  max {:.1}  min {:.1}",
                    stats.magnitude_stats.average,
                    stats.magnitude_stats.maximum,
                    stats.magnitude_stats.minimum
                );
                println!(
                    "depth (km):     avg {:.1}  max {:.1}  min {:.1}",
                    stats.depth_stats.average,
                    stats.depth_stats.maximum,
                    stats.depth_stats.minimum
                );
            }
        }
        Commands::Boundary { ids } => {
            let boundary = client.boundary_stats(&ids).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&boundary)?);
            } else {
                println!("events:       {}", boundary.total_count);
                println!("center:       {}", boundary.center_point);
                println!("bounding box: {}", boundary.bounding_box);
                println!("convex hull:  {}", boundary.convex_hull);
                println!("area:         {:.1} km²", boundary.area_km2);
            }
        }
    }

    Ok(())
}

/// Parse a `lat,lon` pair in storage space.
fn parse_vertex(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lon but got '{s}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{lat}'"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{lon}'"))?;
    GeoPoint::new(lat, lon).map_err(|e| e.to_string())
}

/// Append records, skipping ids already present. A split polygon is
/// searched one half at a time and the halves can overlap at the seam.
fn merge_records(merged: &mut Vec<EarthquakeRecord>, incoming: Vec<EarthquakeRecord>) {
    for record in incoming {
        if !merged.iter().any(|r| r.id == record.id) {
            merged.push(record);
        }
    }
}

fn print_records(records: &[EarthquakeRecord], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("no events found");
        return Ok(());
    }
    for record in records {
        println!("{}", format_record(record));
    }
    println!("{} event(s)", records.len());
    Ok(())
}

fn format_record(record: &EarthquakeRecord) -> String {
    let magnitude = record
        .magnitude
        .map_or_else(|| "M ?.?".to_string(), |m| format!("M {m:.1}"));
    let place = record.place.as_deref().unwrap_or("unknown location");
    let time = record
        .time
        .map_or_else(|| "unknown time".to_string(), |t| t.to_rfc3339());
    let position = match (record.latitude, record.longitude) {
        (Some(lat), Some(lon)) => format!("({lat:.2}, {lon:.2})"),
        _ => "(no position)".to_string(),
    };
    let distance = record
        .distance_km
        .map_or_else(String::new, |d| format!("  {d:.1} km away"));
    format!("{magnitude}  {place}  {time}  {position}{distance}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_vertex_accepts_spaced_pairs() {
        let p = parse_vertex("12.5, -170.25").unwrap();
        assert!((p.lat - 12.5).abs() < 1e-9);
        assert!((p.lon - (-170.25)).abs() < 1e-9);
    }

    #[test]
    fn parse_vertex_rejects_malformed_input() {
        assert!(parse_vertex("12.5").is_err());
        assert!(parse_vertex("a,b").is_err());
        assert!(parse_vertex("95.0,10.0").is_err());
    }

    #[test]
    fn merge_records_deduplicates_by_id() {
        let mut merged = Vec::new();
        merge_records(
            &mut merged,
            vec![sample("a"), sample("b")],
        );
        merge_records(
            &mut merged,
            vec![sample("b"), sample("c")],
        );
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn format_record_handles_missing_fields() {
        let line = format_record(&sample("x"));
        assert!(line.contains("M ?.?"));
        assert!(line.contains("unknown location"));
        assert!(line.contains("(no position)"));
    }

    fn sample(id: &str) -> EarthquakeRecord {
        EarthquakeRecord {
            id: id.to_string(),
            magnitude: None,
            place: None,
            time: None,
            depth: None,
            latitude: None,
            longitude: None,
            url: None,
            distance_km: None,
        }
    }
}
