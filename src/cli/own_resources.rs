use log::warn;

use crate::aggregator::evaluate;
use crate::classifier::classify;
use crate::cli::render::{print_no_data, print_title, report_table};
use crate::error::Result;
use crate::loader;
use crate::rules::{own_resources, own_resources_rollups, Band};
use crate::settings::load_settings;

pub fn run(
    band: Option<String>,
    detail: bool,
    source: Option<String>,
    refresh: bool,
) -> Result<()> {
    let bands: Vec<Band> = match band {
        Some(s) => vec![Band::parse(&s)?],
        None => Band::ALL.to_vec(),
    };

    let settings = load_settings();
    let source = source.unwrap_or_else(|| settings.source.clone());

    let raw = loader::load(&source, &settings, refresh)?;
    let rows = classify(raw);

    // Each band renders independently: an empty band degrades to a
    // notice while the remaining bands still print.
    for band in bands {
        let report = evaluate(&rows, &own_resources(band));
        if !report.has_matches() {
            warn!("own-resources band {} matched no rows", band.label());
            print_no_data(band.label());
            continue;
        }
        print_title(&report.title);
        let rollups = own_resources_rollups(band);
        let only = if detail { None } else { Some(rollups.as_slice()) };
        println!("{}", report_table(&report, only));
    }
    Ok(())
}
