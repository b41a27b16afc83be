//! Vendor command generation.
//!
//! One [`CommandRenderer`] per vendor maps the immutable [`Switch`] model
//! to an ordered CLI line sequence. Rendering is a pure function of the
//! model: same model, same lines. Missing or malformed values render as
//! omitted lines, never as errors.

mod alcatel;
mod aruba;
mod cisco;
mod hp;
mod juniper;

pub use alcatel::AlcatelRenderer;
pub use aruba::ArubaRenderer;
pub use cisco::CiscoRenderer;
pub use hp::HpRenderer;
pub use juniper::JuniperRenderer;

use crate::models::Switch;

/// CommandRenderer turns the configuration model into one vendor's CLI text
pub trait CommandRenderer: Sync {
    fn brand(&self) -> &'static str;
    fn render(&self, switch: &Switch) -> Vec<String>;
}

static CISCO: CiscoRenderer = CiscoRenderer;
static HP: HpRenderer = HpRenderer;
static JUNIPER: JuniperRenderer = JuniperRenderer;
static ARUBA: ArubaRenderer = ArubaRenderer;
static ALCATEL: AlcatelRenderer = AlcatelRenderer;

/// Resolve a renderer by brand, case-insensitively
pub fn renderer_for(brand: &str) -> Option<&'static dyn CommandRenderer> {
    match brand.to_lowercase().as_str() {
        "cisco" => Some(&CISCO),
        "hp" => Some(&HP),
        "juniper" => Some(&JUNIPER),
        "aruba" => Some(&ARUBA),
        "alcatel" => Some(&ALCATEL),
        _ => None,
    }
}

/// Render the ordered line sequence for a switch.
/// An unrecognized brand yields an empty sequence.
pub fn generate_lines(switch: &Switch) -> Vec<String> {
    match renderer_for(&switch.brand) {
        Some(renderer) => {
            let lines = renderer.render(switch);
            tracing::debug!(
                "Generated {} lines for {} {}",
                lines.len(),
                switch.brand,
                switch.model
            );
            lines
        }
        None => {
            tracing::warn!("Unknown brand '{}', nothing generated", switch.brand);
            Vec::new()
        }
    }
}

/// Render the full configuration text, lines joined with `\n`
pub fn generate_config(switch: &Switch) -> String {
    generate_lines(switch).join("\n")
}

/// Append the template's default commands with `{hostname}` substituted
fn append_default_commands(lines: &mut Vec<String>, switch: &Switch) {
    for cmd in &switch.template().default_commands {
        lines.push(cmd.replace("{hostname}", &switch.hostname));
    }
}
