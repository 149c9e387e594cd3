extern crate pretty_env_logger;
#[macro_use] extern crate log;

use fog_bulletin::{filter, group, Bulletin, BulletinConfig, SelectionMap};
use std::env;

fn load_config() -> Result<BulletinConfig, anyhow::Error> {
    if let Ok(path) = env::var("BULLETIN_CONFIG") {
        return BulletinConfig::from_file(path);
    }
    let preset = env::var("BULLETIN_PRESET").unwrap_or_else(|_| "fog".to_string());
    debug!("Using built-in '{}' preset", preset);
    BulletinConfig::preset(&preset)
}

/// Default selections, overridden from a JSON file when one is given
fn load_selections(config: &BulletinConfig, path: Option<&String>) -> Result<SelectionMap, anyhow::Error> {
    let mut selections = SelectionMap::initialized(&config.regions, &config.palette());
    if let Some(path) = path {
        let json = std::fs::read_to_string(path)?;
        selections.apply_json(&json)?;
    }
    Ok(selections)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [args...]", program);
    eprintln!("");
    eprintln!("Commands:");
    eprintln!("  classify <value>                          - Classify a visibility (m) or cloud cover (%) reading");
    eprintln!("  table                                     - Print the classification table");
    eprintln!("  regions [state|state:name]                - List forecast regions grouped by state");
    eprintln!("  forecast [category] [selections.json]     - Print the forecast table, optionally filtered");
    eprintln!("  export <output.json> [selections.json] [notes] [category] - Write the bulletin snapshot");
    eprintln!("");
    eprintln!("Environment:");
    eprintln!("  BULLETIN_CONFIG  Path to a JSON bulletin config");
    eprintln!("  BULLETIN_PRESET  Built-in preset when no config is given: fog (default) or cloud");
    eprintln!("");
    eprintln!("Examples:");
    eprintln!("  {} classify 350", program);
    eprintln!("  {} forecast \"Moderate Fog\" selections.json", program);
    eprintln!("  BULLETIN_PRESET=cloud {} export cloud.json", program);
}

fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let config = load_config()?;
    let command = &args[1];

    match command.as_str() {
        "classify" => {
            if args.len() < 3 {
                eprintln!("Specify a value to classify");
                std::process::exit(1);
            }

            let value: f64 = match args[2].parse() {
                Ok(v) => v,
                Err(_) => {
                    eprintln!("Invalid value: {} (must be a number)", args[2]);
                    std::process::exit(1);
                }
            };

            let classifier = config.classifier();
            match classifier.classify(value) {
                Some(bucket) => {
                    println!("Category: {}", bucket.label);
                    println!("Range:    {}", bucket.cover);
                    println!("Effect:   {}", bucket.kind);
                    println!("Color:    {}", classifier.color_of(value).unwrap_or("-"));
                    println!("Icon:     {}", classifier.icon_of(value).unwrap_or("-"));
                }
                None => {
                    eprintln!("No buckets configured");
                    std::process::exit(1);
                }
            }
        }

        "table" => {
            println!("{}", config.title);
            for row in config.classifier().classification_table() {
                println!(
                    "{:>2}. {:<28} {:<48} {}",
                    row.index,
                    row.label,
                    row.cover,
                    row.color.as_deref().unwrap_or("-")
                );
            }
        }

        "regions" => {
            let catalog = config.catalog();
            if catalog.is_empty() {
                eprintln!("No regions configured");
                std::process::exit(1);
            }

            if let Some(id) = args.get(2).filter(|a| a.contains(':')) {
                match catalog.by_id(id) {
                    Some(region) => println!("{} ({}) key: {}", region.name, region.state, region.key()),
                    None => {
                        eprintln!("Unknown region: {}", id);
                        std::process::exit(1);
                    }
                }
                return Ok(());
            }

            let states: Vec<String> = match args.get(2) {
                Some(state) => vec![state.clone()],
                None => catalog.states().iter().map(|s| s.to_string()).collect(),
            };

            println!("{} regions in {} states", catalog.len(), catalog.states().len());
            for state in &states {
                let regions = catalog.in_state(state);
                if regions.is_empty() {
                    eprintln!("No regions for state: {}", state);
                    continue;
                }
                println!("{} ({})", state, regions.len());
                for region in regions {
                    println!("  {}", region.name);
                }
            }
        }

        "forecast" => {
            let target = args.get(2).map(|s| s.as_str()).filter(|t| !t.is_empty());
            if let Some(t) = target {
                if !config.palette().contains(t) {
                    warn!("'{}' is not a known category; nothing will match", t);
                }
            }

            let selections = load_selections(&config, args.get(3))?;
            let view = group(&config.regions);
            let visible = filter(&view, &selections, target);

            for row in view.retain(&visible).rows(&selections) {
                let state = if row.state_rowspan.is_some() { row.state.as_str() } else { "" };
                println!(
                    "{:>3}  {:<16} {:<28} {:<28} {}",
                    row.display_index,
                    state,
                    row.name,
                    row.day1.as_deref().unwrap_or("-"),
                    row.day2.as_deref().unwrap_or("-")
                );
            }
        }

        "export" => {
            let output = args.get(2).cloned().unwrap_or_else(|| config.export_filename.clone());
            let selections = load_selections(&config, args.get(3).filter(|p| !p.is_empty()))?;
            let notes = args.get(4).map(|s| s.as_str()).unwrap_or("");
            let target = args.get(5).map(|s| s.as_str());

            let bulletin = Bulletin::build(&config, &selections, notes, &chrono::Utc::now(), target);
            let filename = bulletin.save(&output)?;
            println!("✅ Successfully saved bulletin to: {}", filename);
        }

        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }

    Ok(())
}
