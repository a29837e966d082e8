use super::Host;
use super::config::{CONFIG_FILE_NAME, Config};
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file (default is `pkg-rate.toml`)
    #[arg(value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    validate_config_in(host, args, Utf8Path::new("."))
}

fn validate_config_in<H: Host>(host: &mut H, args: &ValidateArgs, base_dir: &Utf8Path) -> Result<()> {
    let config_path = args.config.as_ref();

    match Config::load(base_dir, config_path) {
        Ok(_) => {
            let default_path = base_dir.join(CONFIG_FILE_NAME);
            let _ = writeln!(host.output(), "Configuration file is valid");
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else if default_path.is_file() {
                let _ = writeln!(host.output(), "Config file: {default_path}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file found)");
            }
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::commands::init::{InitArgs, init_config};

    fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join(name)).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn validate(path: Utf8PathBuf) -> (Result<()>, TestHost) {
        let mut host = TestHost::new();
        let result = validate_config(&mut host, &ValidateArgs { config: Some(path) });
        (result, host)
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_generated_config_is_valid() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("pkg-rate.toml")).unwrap();

        let mut init_host = TestHost::new();
        init_config(&mut init_host, &InitArgs { output: Some(path.clone()), force: false }).unwrap();

        let (result, host) = validate(path);
        result.unwrap();
        assert!(host.output_text().contains("Configuration file is valid"));
        assert_eq!(host.exit_code, None);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_reports_config_found_in_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let args = ValidateArgs { config: None };

        let mut host = TestHost::new();
        validate_config_in(&mut host, &args, &base_dir).unwrap();
        assert!(host.output_text().contains("Using default configuration"));

        let path = write_config(&tmp, CONFIG_FILE_NAME, "task_timeout = \"10s\"\n");

        let mut host = TestHost::new();
        validate_config_in(&mut host, &args, &base_dir).unwrap();
        let output = host.output_text();
        assert!(output.contains(&format!("Config file: {path}")), "{output}");
        assert!(!output.contains("Using default configuration"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_empty_config_is_valid() {
        let tmp = tempfile::tempdir().unwrap();
        let (result, _) = validate(write_config(&tmp, "empty.toml", "# Empty config file\n"));
        assert!(result.is_ok(), "Empty config should be valid (uses defaults)");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_invalid_toml_syntax() {
        let tmp = tempfile::tempdir().unwrap();
        let (result, host) = validate(write_config(&tmp, "invalid.toml", "[weights\nramp_up = 0.1\n"));

        assert!(result.is_err());
        assert_eq!(host.exit_code, Some(1));
        assert!(host.error_text().contains("Configuration validation failed"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_unknown_field() {
        let tmp = tempfile::tempdir().unwrap();
        let (result, _) = validate(write_config(&tmp, "unknown.toml", "[metrics]\nstar_weight = 1.0\n"));
        assert!(result.is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_invalid_duration_format() {
        let tmp = tempfile::tempdir().unwrap();
        let (result, _) = validate(write_config(&tmp, "duration.toml", "task_timeout = \"not a valid duration\"\n"));
        assert!(result.is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_weights_must_sum_to_one() {
        let tmp = tempfile::tempdir().unwrap();
        let (result, host) = validate(write_config(&tmp, "weights.toml", "[weights]\nramp_up = 0.3\n"));
        assert!(result.is_err());
        assert!(host.error_text().contains("sum to 1.0"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_unknown_license_in_allow_list() {
        let tmp = tempfile::tempdir().unwrap();
        let (result, _) = validate(write_config(&tmp, "license.toml", "[metrics]\nlicense_allow_list = [\"Not-A-License\"]\n"));
        assert!(result.is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_redistributed_weights_are_valid() {
        let tmp = tempfile::tempdir().unwrap();
        let (result, _) = validate(write_config(
            &tmp,
            "redistributed.toml",
            "[weights]\nramp_up = 0.05\ncorrectness = 0.20\n",
        ));
        result.unwrap();
    }
}
