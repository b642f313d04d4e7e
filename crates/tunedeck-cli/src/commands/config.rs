use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tunedeck_infrastructure::ConfigService;

pub fn show(config_service: &ConfigService, download_dir: &Path) -> Result<()> {
    let config = config_service.get_config()?;
    let paths = config_service.paths();

    println!("{}", "Configuration".bold());
    println!("  {:<22} {}", "config file", paths.config_file()?.display());
    println!("  {:<22} {}", "session file", paths.session_file()?.display());
    println!("  {:<22} {}", "logs", paths.logs_dir()?.display());
    println!();
    println!("  {:<22} {}", "api_base_url", config.base_url().cyan());
    println!("  {:<22} {}s", "request_timeout_secs", config.request_timeout_secs);
    println!("  {:<22} {}", "download_dir", download_dir.display());
    println!("  {:<22} {}", "log_level", config.log_level);
    println!("  {:<22} {}", "default_volume", config.default_volume);
    Ok(())
}
