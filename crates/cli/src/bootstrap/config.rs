use httpse_domain::Config;
use std::path::Path;

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    let config = Config::load(config_path.map(Path::new))?;
    Ok(config)
}
