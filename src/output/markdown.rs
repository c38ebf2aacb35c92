//! Markdown directory generation
//!
//! This module writes a human-readable directory of located places,
//! grouped by building and floor.

use crate::output::{OutputResult, Place};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Buildings of the mapped complex in display order
const BUILDING_ORDER: [&str; 4] = ["Hauptbau", "E1", "E2", "E3"];

/// Generates a markdown directory of places
///
/// # Arguments
///
/// * `places` - The places to list
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the directory
/// * `Err(OutputError)` - Failed to write the file
pub fn generate_markdown_directory(places: &[Place], output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_directory(places);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote directory of {} places to {}", places.len(), output_path.display());
    Ok(())
}

/// Formats places as a markdown directory
///
/// Known buildings come first in their fixed order, any other building
/// after them alphabetically. Floors ascend from the basement.
pub fn format_markdown_directory(places: &[Place]) -> String {
    let mut md = String::new();

    md.push_str("# Campus-Atlas Directory\n\n");
    md.push_str(&format!("- **Places**: {}\n\n", places.len()));

    let mut buildings: BTreeMap<(usize, &str), BTreeMap<i16, Vec<&Place>>> = BTreeMap::new();
    for place in places {
        let rank = BUILDING_ORDER
            .iter()
            .position(|b| *b == place.building)
            .unwrap_or(BUILDING_ORDER.len());

        buildings
            .entry((rank, place.building.as_str()))
            .or_default()
            .entry(place.floor)
            .or_default()
            .push(place);
    }

    for ((_, building), floors) in buildings {
        md.push_str(&format!("## {}\n\n", building));

        for (floor, mut entries) in floors {
            entries.sort_by(|a, b| a.category.cmp(&b.category).then(a.name.cmp(&b.name)));

            md.push_str(&format!("### {}\n\n", floor_label(floor)));
            md.push_str("| Name | Category | Link |\n");
            md.push_str("|------|----------|------|\n");

            for place in entries {
                let link = place
                    .url
                    .as_deref()
                    .map(|url| format!("[page]({})", url))
                    .unwrap_or_default();
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    escape_cell(&place.name),
                    place.category,
                    link
                ));
            }
            md.push('\n');
        }
    }

    md
}

fn floor_label(floor: i16) -> String {
    match floor {
        f if f < 0 => format!("Basement ({})", f),
        0 => "Ground floor".to_string(),
        f => format!("Floor {}", f),
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
