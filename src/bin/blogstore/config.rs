use std::env;
use std::path::PathBuf;

use blogstore::config::{read_config, Config, Storage};
use blogstore::store::DEFAULT_STORAGE_DIR;

use crate::config_data::write_sample_cfg;
use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));
    let cur_dir = env::current_dir().ok();

    [exe_dir, cur_dir, dirs::config_dir()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("BlogStore")
        .join("log")
        .join("blogstore.log")
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let Some(config_path) = cfg_path.or_else(get_config_path) else {
        println!("No {} found. Using {} in the current directory", CFG_FILE_NAME, DEFAULT_STORAGE_DIR);
        return Ok(Config {
            storage: Storage {
                folder: PathBuf::from(DEFAULT_STORAGE_DIR),
                extension: None,
            },
            log: None,
        });
    };

    println!("Reading config from {}", config_path.display());
    let mut config = read_config(&config_path).map_err(|e| e.to_string())?;

    if let Some(ref mut log) = config.log {
        let location = log.location.take().unwrap_or_else(default_log_file);
        println!("Log enabled. Files will be written in {}", location.display());
        log.location = Some(location);
    }

    Ok(config)
}

pub(crate) fn generate_cfg(config_path: Option<PathBuf>) -> Result<PathBuf, String> {
    let path = match config_path {
        Some(path) => path,
        None => dirs::config_dir()
            .ok_or("Could not find user config dir")?
            .join(CFG_FILE_NAME),
    };

    println!("Writing sample config to {}", path.display());
    write_sample_cfg(&path, &default_log_file()).map_err(|e| e.to_string())?;

    Ok(path)
}
