use hl_core::TrackerConfig;

pub fn run(
    config: &TrackerConfig,
    name: &str,
    new_name: &str,
    phase: Option<usize>,
) -> Result<(), String> {
    let mut hunts = super::load(config)?;
    let id = super::find(&hunts, name)?;

    match phase {
        Some(number) => {
            let index = super::phase_index(number)?;
            hunts
                .rename_phase(id, index, new_name)
                .map_err(|e| e.to_string())?;
            println!("  {name} phase {number} is now \"{new_name}\"");
        }
        None => {
            if hunts
                .find_by_name(new_name)
                .is_some_and(|c| c.id() != id)
            {
                return Err(format!("campaign already exists: \"{new_name}\""));
            }
            hunts.rename(id, new_name).map_err(|e| e.to_string())?;
            println!("  {name} is now \"{new_name}\"");
        }
    }

    super::save(config, &hunts)
}
