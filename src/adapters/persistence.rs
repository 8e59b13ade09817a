use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use swissgit_core::ports::{AppConfig, ConfigStore};
use swissgit_core::DEFAULT_TEMPLATE;

const MERGE_METHODS: [&str; 3] = ["MERGE", "SQUASH", "REBASE"];

/// TOML configuration file, created with defaults on first load
pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    pub fn with_path<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "swissgit")
            .context("Failed to determine project directories")?;
        Ok(proj_dirs.config_dir().join("swissgit.toml"))
    }

    fn ensure_config_exists(&self) -> Result<()> {
        if !self.config_path.exists() {
            if let Some(parent) = self.config_path.parent() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
            self.save(&AppConfig::default())?;
        }
        Ok(())
    }
}

fn validate(config: &AppConfig, path: &Path) -> Result<()> {
    let method = config.github.merge_method.to_uppercase();
    if !MERGE_METHODS.contains(&method.as_str()) {
        bail!(
            "Invalid merge_method '{}' in {}: expected one of {}",
            config.github.merge_method,
            path.display(),
            MERGE_METHODS.join(", ")
        );
    }
    if config.default_branch.trim().is_empty() {
        bail!("default_branch must not be empty in {}", path.display());
    }
    Ok(())
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<AppConfig> {
        self.ensure_config_exists()?;

        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config: AppConfig = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        validate(&config, &self.config_path)?;
        Ok(config)
    }

    fn save(&self, config: &AppConfig) -> Result<()> {
        let contents =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!("Failed to write config file: {}", self.config_path.display())
        })?;

        Ok(())
    }
}

/// Pull request body template: the configured file, else the built-in one
pub fn load_template(config: &AppConfig) -> Result<String> {
    match &config.pull_request.template {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read pull request template: {}", path.display())),
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("swissgit.toml");
        let store = FileConfigStore::with_path(&path);

        let config = store.load()?;
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());

        let contents = fs::read_to_string(&path)?;
        assert!(contents.contains("default_branch = \"main\""));
        assert!(contents.contains("stale_after_days = 120"));
        Ok(())
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileConfigStore::with_path(temp_dir.path().join("swissgit.toml"));

        let mut config = AppConfig::default();
        config.default_branch = "trunk".into();
        config.protected_branches = vec!["develop".into(), "release".into()];
        config.github.merge_method = "SQUASH".into();
        config.ssh.key = Some("id_ed25519".into());
        store.save(&config)?;

        assert_eq!(store.load()?, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_section_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("swissgit.toml");
        fs::write(
            &path,
            "version = 1\ndefault_branch = \"develop\"\nstale_after_days = 30\n",
        )?;

        let config = FileConfigStore::with_path(&path).load()?;
        assert_eq!(config.default_branch, "develop");
        assert_eq!(config.stale_after_days, 30);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(config.protected_branches.is_empty());
        assert!(config.ssh.key.is_none());
        Ok(())
    }

    #[test]
    fn test_invalid_merge_method_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("swissgit.toml");
        fs::write(
            &path,
            "version = 1\ndefault_branch = \"main\"\nstale_after_days = 120\n\n[github]\napi_url = \"https://api.github.com\"\nmerge_method = \"octopus\"\n",
        )?;

        let err = FileConfigStore::with_path(&path).load().unwrap_err();
        assert!(err.to_string().contains("Invalid merge_method"));
        Ok(())
    }

    #[test]
    fn test_invalid_toml_reports_path() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("swissgit.toml");
        fs::write(&path, "version = [")?;

        let err = FileConfigStore::with_path(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }

    #[test]
    fn test_template_fallback_and_override() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut config = AppConfig::default();
        assert_eq!(load_template(&config)?, DEFAULT_TEMPLATE);

        let path = temp_dir.path().join("template.md");
        fs::write(&path, "- [ ] Bug fix\n")?;
        config.pull_request.template = Some(path);
        assert_eq!(load_template(&config)?, "- [ ] Bug fix\n");
        Ok(())
    }
}
