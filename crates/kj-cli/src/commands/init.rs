use std::path::Path;

use anyhow::bail;
use kj_core::KjConfig;

pub fn init(path: &Path, show_name: &str) -> anyhow::Result<()> {
    let output = path.join("kj.toml");
    if output.exists() {
        bail!("{} already exists", output.display());
    }

    std::fs::create_dir_all(path)?;
    let config = KjConfig::scaffold(show_name);
    std::fs::write(&output, config.to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_parseable_config() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path(), "friday").unwrap();

        let config = KjConfig::from_file(&dir.path().join("kj.toml")).unwrap();
        assert_eq!(config.show.name, "friday");
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kj.toml"), "[show]\nname = \"mine\"\n").unwrap();

        let result = init(dir.path(), "friday");
        assert!(result.is_err());
        let kept = std::fs::read_to_string(dir.path().join("kj.toml")).unwrap();
        assert!(kept.contains("mine"));
    }
}
