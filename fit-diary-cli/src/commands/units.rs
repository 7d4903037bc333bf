use clap::Args;
use serde::Serialize;

use fit_diary_core::{resolve_units, DiaryApi, MeasurementUnit, UnitResolution, UnitSource};

use super::OutputFormat;

#[derive(Args)]
pub struct UnitsCommand {
    /// Item identifier (e.g. "taco_66" or "66")
    pub item_id: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct UnitsReport<'a> {
    item_id: &'a str,
    source: Option<&'static str>,
    selected: Option<&'a str>,
    units: &'a [MeasurementUnit],
}

fn source_name(source: UnitSource) -> &'static str {
    match source {
        UnitSource::Item => "item",
        UnitSource::Catalog => "catalog",
    }
}

impl UnitsCommand {
    pub async fn run<A: DiaryApi>(&self, api: &A) -> Result<(), Box<dyn std::error::Error>> {
        let resolution = resolve_units(api, &self.item_id).await;
        let source = match &resolution {
            UnitResolution::Resolved { source, .. } => Some(source_name(*source)),
            UnitResolution::Unavailable => None,
        };
        let selected = resolution.selected().map(|u| u.id.as_str());

        match self.format {
            OutputFormat::Json => {
                let report = UnitsReport {
                    item_id: &self.item_id,
                    source,
                    selected,
                    units: resolution.units(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                let Some(source) = source else {
                    println!("No measurement units available for {}.", self.item_id);
                    println!("The food has not been classified yet; it will be logged per serving.");
                    return Ok(());
                };

                println!("Units for {} (from {}):", self.item_id, source);
                for unit in resolution.units() {
                    let marker = if Some(unit.id.as_str()) == selected { "*" } else { " " };
                    println!("{} {:>4}  {}", marker, unit.id, unit.label());
                }
            }
        }
        Ok(())
    }
}
