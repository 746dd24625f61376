use crate::store::StoreFormat;
use crate::tier::TierPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snapdex")]
#[command(about = "A real-life Pokémon Snap log: rate your animal encounters")]
#[command(version)]
pub(crate) struct Args {
    /// Directory holding per-user record files and photos
    #[arg(long, global = true, default_value = "snap_data")]
    pub data_dir: PathBuf,

    /// Name of the player whose Pokédex is used
    #[arg(short, long, global = true, default_value = "Player1")]
    pub user: String,

    /// Record file format
    #[arg(long, global = true, value_enum, default_value_t = StoreFormat::Json)]
    pub format: StoreFormat,

    /// Whether tiers are derived from score or chosen on submission
    #[arg(long, global = true, value_enum, default_value_t = TierPolicy::Derived)]
    pub tier_policy: TierPolicy,

    /// Highest score a submission may carry
    #[arg(long, global = true, default_value = "5000")]
    pub max_score: u32,

    /// Catalog file with one animal name per line
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Accept submissions without a photo
    #[arg(long, global = true)]
    pub allow_missing_photo: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Log a sighting; kept only if it beats the stored score
    Submit {
        /// Animal name from the catalog
        animal: String,

        #[arg(short, long)]
        score: u32,

        /// Behaviour rating from 1 to 4
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=4))]
        stars: u8,

        /// Bronze, Silver, Gold or Diamond (used with --tier-policy chosen)
        #[arg(long)]
        tier: Option<String>,

        /// Photo file (jpg, jpeg or png)
        #[arg(short, long)]
        photo: Option<PathBuf>,

        /// Where the animal was seen, e.g. "Lumpini Park, Bangkok"
        #[arg(short, long)]
        location: Option<String>,

        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// When it was seen: YYYY-MM-DD or YYYY-MM-DD HH:MM:SS (default now)
        #[arg(long)]
        seen_at: Option<String>,
    },

    /// Show the checklist of every catalog animal
    Dex,

    /// Show the stored sighting for one animal
    Show { animal: String },

    /// Remove the stored sighting for one animal
    Delete { animal: String },

    /// Print located sightings as GeoJSON
    Map {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Submit every row of a CSV file
    Import { file: PathBuf },

    /// Write the user's records to a CSV file
    Export { file: PathBuf },

    /// List the catalog
    Catalog,
}
