use std::fs;
use std::path::PathBuf;

const SAMPLE_CONFIG: &str = include_str!("../../samples/sample-config.yml");

pub fn init(stdout: bool) -> Result<(), Box<dyn std::error::Error>> {
    if stdout {
        print!("{}", SAMPLE_CONFIG);
        return Ok(());
    }

    // Try ~/.config/triagent/config.yml first, fall back to /etc/triagent
    let config_path = dirs::home_dir()
        .map(|home| home.join(".config/triagent/config.yml"))
        .unwrap_or_else(|| PathBuf::from("/etc/triagent/config.yml"));

    if config_path.exists() {
        eprintln!(
            "Error: Config file already exists at {}",
            config_path.display()
        );
        eprintln!("Remove it first or use --stdout to print the config");
        std::process::exit(1);
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, SAMPLE_CONFIG)?;
    println!("Config file written to {}", config_path.display());
    Ok(())
}

pub fn validate(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path.ok_or("No config file found. Use --config to specify a path.")?;

    println!("Validating config file: {}", path.display());

    match crate::config::load_config(&path) {
        Ok(_) => {
            println!("✓ Config is valid");
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Config validation failed:\n{}", e);
            std::process::exit(1);
        }
    }
}
