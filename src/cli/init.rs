use crate::error::Result;
use crate::settings::{load_settings, save_settings};

pub fn run(source: &str, ttl: u64) -> Result<()> {
    let mut settings = load_settings();
    settings.source = source.to_string();
    settings.cache_ttl_secs = ttl;
    save_settings(&settings)?;

    std::fs::create_dir_all(settings.cache_dir())?;

    println!("Configured source: {source}");
    println!("Cache TTL: {ttl}s");
    Ok(())
}
