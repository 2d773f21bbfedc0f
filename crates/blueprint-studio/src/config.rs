use std::path::PathBuf;

use clap::Parser;
use clap::builder::FalseyValueParser;

use blueprint_engine::logging::LoggingConfig;

/// Default model location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "assets/Drone.obj";

/// Studio settings.
///
/// Precedence: command line, then `BLUEPRINT_*` environment variables, then
/// the defaults.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "blueprint")]
#[command(about = "Scroll-driven blueprint showcase for an OBJ model")]
pub struct ShowcaseConfig {
    /// Wavefront OBJ model to show
    #[arg(value_name = "MODEL", env = "BLUEPRINT_MODEL", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Add a red 10-unit cube at the origin on the solid layer
    #[arg(long, env = "BLUEPRINT_DEBUG_CUBE", value_parser = FalseyValueParser::new())]
    pub debug_cube: bool,

    /// `env_logger` filter; falls back to `RUST_LOG`
    #[arg(long = "log", value_name = "FILTER", env = "BLUEPRINT_LOG")]
    pub log_filter: Option<String>,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            debug_cube: false,
            log_filter: None,
        }
    }
}

impl ShowcaseConfig {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log_filter.clone(),
            ..LoggingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    const VARS: [&str; 3] = ["BLUEPRINT_MODEL", "BLUEPRINT_LOG", "BLUEPRINT_DEBUG_CUBE"];

    /// Serializes tests that read or write the process environment.
    static ENV: Mutex<()> = Mutex::new(());

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<ShowcaseConfig, clap::Error> {
        let _guard = ENV.lock().unwrap_or_else(|e| e.into_inner());
        // SAFETY: every test touching these variables holds `ENV`.
        unsafe {
            for var in VARS {
                std::env::remove_var(var);
            }
            for (key, value) in env {
                std::env::set_var(key, value);
            }
        }
        let parsed = ShowcaseConfig::try_parse_from(std::iter::once("blueprint").chain(args.iter().copied()));
        // SAFETY: as above.
        unsafe {
            for var in VARS {
                std::env::remove_var(var);
            }
        }
        parsed
    }

    fn config(args: &[&str], env: &[(&str, &str)]) -> ShowcaseConfig {
        parse(args, env).unwrap()
    }

    #[test]
    fn defaults() {
        let c = config(&[], &[]);
        assert_eq!(c, ShowcaseConfig::default());
        assert_eq!(c.model_path, PathBuf::from("assets/Drone.obj"));
    }

    #[test]
    fn env_overrides_defaults() {
        let c = config(
            &[],
            &[("BLUEPRINT_MODEL", "/tmp/x.obj"), ("BLUEPRINT_LOG", "debug"), ("BLUEPRINT_DEBUG_CUBE", "1")],
        );
        assert_eq!(c.model_path, PathBuf::from("/tmp/x.obj"));
        assert_eq!(c.log_filter.as_deref(), Some("debug"));
        assert!(c.debug_cube);
    }

    #[test]
    fn arguments_override_env() {
        let c = config(
            &["plane.obj", "--log", "warn"],
            &[("BLUEPRINT_MODEL", "/tmp/x.obj"), ("BLUEPRINT_LOG", "debug")],
        );
        assert_eq!(c.model_path, PathBuf::from("plane.obj"));
        assert_eq!(c.log_filter.as_deref(), Some("warn"));
    }

    #[test]
    fn debug_cube_flag_and_falsy_env() {
        assert!(config(&["--debug-cube"], &[("BLUEPRINT_DEBUG_CUBE", "0")]).debug_cube);
        assert!(!config(&[], &[("BLUEPRINT_DEBUG_CUBE", "off")]).debug_cube);
    }

    #[test]
    fn unknown_and_extra_arguments_are_rejected() {
        assert!(parse(&["a.obj", "b.obj"], &[]).is_err());
        assert!(parse(&["--fast"], &[]).is_err());
    }

    #[test]
    fn log_flag_needs_a_filter() {
        assert!(parse(&["--log"], &[]).is_err());
    }

    #[test]
    fn logging_uses_the_filter() {
        let c = config(&["--log", "blueprint_engine=debug"], &[]);
        assert_eq!(c.logging().env_filter.as_deref(), Some("blueprint_engine=debug"));
    }
}
