use clap::Args;
use onetap_core::Config;

use crate::render;

#[derive(Args)]
pub struct PresetsArgs {
    /// Print the table as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: PresetsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let presets = Config::load_or_default().presets();
    if args.json {
        println!("{}", serde_json::to_string_pretty(presets.as_slice())?);
        return Ok(());
    }

    for preset in presets.iter() {
        println!(
            "{:>4}  {} {:<16} {:>3} min",
            preset.id,
            render::icon_glyph(preset.icon),
            preset.name,
            preset.duration_min()
        );
    }
    Ok(())
}
