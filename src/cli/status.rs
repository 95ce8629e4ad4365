use std::time::Duration;

use chrono::{DateTime, Local};

use crate::cache::{cache_path, is_fresh};
use crate::error::Result;
use crate::settings::{load_settings, settings_file_exists};

pub fn run() -> Result<()> {
    let settings = load_settings();

    if !settings_file_exists() {
        println!("No settings file. Run `apoteo init --source <url|file>`.");
    }

    let source = if settings.source.is_empty() {
        "(not set)"
    } else {
        &settings.source
    };
    println!("Source:     {source}");
    println!("Cache dir:  {}", settings.cache_dir().display());
    println!("Cache TTL:  {}s", settings.cache_ttl_secs);

    if settings.source.starts_with("http") {
        let path = cache_path(&settings.cache_dir(), &settings.source);
        println!();
        if path.exists() {
            let modified: DateTime<Local> = std::fs::metadata(&path)?.modified()?.into();
            let fresh = is_fresh(&path, Duration::from_secs(settings.cache_ttl_secs));
            println!("Cached copy: {}", path.display());
            println!("Fetched:     {}", modified.format("%Y-%m-%d %H:%M:%S"));
            println!("State:       {}", if fresh { "fresh" } else { "stale" });
        } else {
            println!("No cached copy yet.");
        }
    }

    Ok(())
}
