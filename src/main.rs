mod catalog;
mod config;
mod dex;
mod error;
mod import;
mod parse;
mod record;
mod store;
mod tier;
mod view;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::dex::{DeleteOutcome, Pokedex, Submission, SubmitOutcome};
use crate::parse::{Args, Command};
use crate::record::{UserId, parse_timestamp};
use crate::store::{FileStore, FsPhotoStore};
use crate::tier::{Stars, Tier};
use chrono::Local;
use clap::Parser;
use log::{LevelFilter, debug};
use std::fs;
use std::process;

type AppDex = Pokedex<FileStore, FsPhotoStore>;

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}

fn build_dex(args: &Args) -> Result<AppDex, Box<dyn std::error::Error>> {
    let config = Config::new()
        .with_data_dir(&args.data_dir)
        .with_format(args.format)
        .with_tier_policy(args.tier_policy)
        .with_max_score(args.max_score)
        .with_require_photo(!args.allow_missing_photo);

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::default(),
    };
    debug!("Using {:?} with {} catalog entries", config, catalog.len());

    let store = FileStore::new(&config.data_dir, config.format);
    let photos = FsPhotoStore::new(config.photo_dir());
    Ok(Pokedex::new(store, photos, catalog, config))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let pokedex = build_dex(&args)?;
    let user = UserId::try_from(args.user.as_str())?;

    match args.command {
        Command::Submit {
            animal,
            score,
            stars,
            tier,
            photo,
            location,
            lat,
            lon,
            seen_at,
        } => {
            let timestamp = match seen_at {
                Some(ts) => parse_timestamp(&ts)?,
                None => Local::now().naive_local(),
            };
            let submission = Submission {
                animal,
                score,
                stars: Stars::try_from(stars)?,
                tier: tier.as_deref().map(str::parse::<Tier>).transpose()?,
                photo,
                location,
                latitude: lat,
                longitude: lon,
                timestamp,
            };

            match pokedex.submit(&user, submission)? {
                SubmitOutcome::Accepted { record, replaced } => {
                    match replaced {
                        Some(old) => println!(
                            "Entry saved for {}! New best {} (was {})",
                            record.animal, record.score, old
                        ),
                        None => println!("Entry saved for {}!", record.animal),
                    }
                    println!("{} {}", record.tier.label(), record.stars);
                }
                SubmitOutcome::Rejected { existing } => {
                    println!(
                        "You already have a higher score for this animal ({}).",
                        existing
                    );
                }
            }
        }
        Command::Dex => {
            let records = pokedex.records(&user)?;
            let entries = dex::render(pokedex.catalog(), &records);
            let progress = dex::progress(&entries);
            print!("{}", view::format_dex(user.as_str(), &entries, progress));
        }
        Command::Show { animal } => match pokedex.entry(&user, &animal)? {
            Some(record) => print!("{}", view::format_record(&record)),
            None => println!("🔲 {} has not been logged yet", animal.trim()),
        },
        Command::Delete { animal } => match pokedex.delete(&user, &animal)? {
            DeleteOutcome::Deleted(record) => println!("Deleted entry for {}", record.animal),
            DeleteOutcome::NotFound => println!("No entry for {}", animal.trim()),
        },
        Command::Map { output } => {
            let points = dex::map_points(&pokedex.records(&user)?);
            let geojson = serde_json::to_string_pretty(&dex::to_geojson(&points))?;
            match output {
                Some(path) => {
                    fs::write(&path, geojson)?;
                    println!("Wrote {} locations to {}", points.len(), path.display());
                }
                None => println!("{}", geojson),
            }
        }
        Command::Import { file } => {
            let summary =
                import::import_csv(&pokedex, &user, &file, Local::now().naive_local())?;
            println!(
                "Imported {}: {} accepted, {} rejected, {} failed",
                file.display(),
                summary.accepted,
                summary.rejected,
                summary.failed
            );
        }
        Command::Export { file } => {
            let count = import::export_csv(&pokedex, &user, &file)?;
            println!("Exported {} records to {}", count, file.display());
        }
        Command::Catalog => {
            for animal in pokedex.catalog().iter() {
                println!("{}", animal);
            }
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        debug!("{:?}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
