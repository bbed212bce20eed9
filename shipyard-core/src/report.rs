//! Report formatting utilities for Shipyard outputs.

use std::fmt::Write;

use chrono::Datelike;
use serde::Serialize;

use crate::domain::Ship;

/// Render ships as aligned plain-text rows.
pub fn render_ships_text(ships: &[Ship]) -> String {
    if ships.is_empty() {
        return "No ships found.\n".to_string();
    }
    let mut output = String::new();
    for ship in ships {
        let _ = writeln!(
            output,
            "#{:<5} {:<20} {:<14} {:<9} year {} speed {:.2} crew {:<4} {} rating {:.2}",
            ship.id,
            ship.name,
            ship.planet,
            ship.ship_type,
            production_year(ship),
            ship.speed,
            ship.crew_size,
            if ship.is_used { "used" } else { "new " },
            ship.rating,
        );
    }
    output
}

/// Render ships as a Markdown table.
pub fn render_ships_markdown(ships: &[Ship]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Shipyard Fleet\n");
    if ships.is_empty() {
        let _ = writeln!(output, "No ships found.");
        return output;
    }
    let _ = writeln!(
        output,
        "| Id | Name | Planet | Type | Year | Used | Speed | Crew | Rating |"
    );
    let _ = writeln!(output, "|---|---|---|---|---|---|---|---|---|");
    for ship in ships {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} | {:.2} | {} | {:.2} |",
            ship.id,
            escape_cell(&ship.name),
            escape_cell(&ship.planet),
            ship.ship_type,
            production_year(ship),
            if ship.is_used { "yes" } else { "no" },
            ship.speed,
            ship.crew_size,
            ship.rating,
        );
    }
    output
}

/// Render any serializable payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn production_year(ship: &Ship) -> i32 {
    ship.prod_date.year()
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
