use std::{
    fs::{DirBuilder, File, OpenOptions},
    io::{BufRead as _, BufReader, Read, Write},
    path::Path,
};

use config::ConfigError;

use crate::CliError;
use crate::configuration::CONFIG_DIR;

const CONFIG_TEMPLATE: &str = r#"# ydocs configuration
app_settings:
  name: "ydocs"
  port: "8000"
  host: "127.0.0.1"
  # Directory holding one YAML file per document.
  source_dir: "./yml"
  # abort: a malformed document fails the request
  # skip:  malformed documents are logged and left out
  on_parse_error: "abort"
"#;

pub fn create_config_template() -> Result<(), CliError> {
    create_config_template_in(Path::new("."))
}

pub fn create_config_template_in(base: &Path) -> Result<(), CliError> {
    let config_dir = base.join(CONFIG_DIR);
    let config_path = config_dir.join("config.yml");
    let gitignore_path = base.join(".gitignore");
    let config_entry = format!("/{CONFIG_DIR}");

    let is_git_repo = base.join(".git").exists();

    if config_path.exists() {
        let mut existing_file = File::open(&config_path)?;
        let mut contents = String::new();
        existing_file.read_to_string(&mut contents)?;
        if !contents.trim().is_empty() {
            return Err(ConfigError::Message(
                "Config file already exists and is not empty. Please remove or rename the existing config.yml file.".to_string()
            ).into());
        }
    }

    DirBuilder::new().recursive(true).create(&config_dir)?;

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&config_path)?;
    file.write_all(CONFIG_TEMPLATE.as_bytes())?;

    if is_git_repo {
        if gitignore_path.exists() {
            let gitignore_file = File::open(&gitignore_path)?;
            let reader = BufReader::new(gitignore_file);
            let mut found_config_entry = false;

            for line in reader.lines() {
                if line?.trim() == config_entry {
                    found_config_entry = true;
                    break;
                }
            }

            if found_config_entry {
                println!("ℹ️  {config_entry} already exists in .gitignore");
            } else {
                let mut contents = String::new();
                File::open(&gitignore_path)?.read_to_string(&mut contents)?;

                let mut gitignore_file = OpenOptions::new().append(true).open(&gitignore_path)?;
                if !contents.ends_with('\n') && !contents.is_empty() {
                    writeln!(gitignore_file)?;
                }

                writeln!(gitignore_file, "{config_entry}")?;
                println!("✅ Added {config_entry} to existing .gitignore");
            }
        } else {
            let mut gitignore_file = File::create(&gitignore_path)?;
            writeln!(gitignore_file, "{config_entry}")?;
            println!("✅ Created .gitignore with {config_entry} entry");
        }
    } else {
        println!("ℹ️  Not a Git repository - skipping .gitignore update");
    }

    println!("✅ config.yml created successfully!");
    Ok(())
}
