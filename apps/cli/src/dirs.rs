use std::path::PathBuf;

use crate::config::APP_DIR_NAME;

const DATA_DIR_ENV: &str = "FOOTPRINT_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataDirSource {
    Argument,
    Environment,
    XdgDataHome,
    Home,
}

#[derive(Debug, Clone)]
pub struct DataDirResolution {
    pub dir: PathBuf,
    pub source: DataDirSource,
}

pub fn resolve_data_dir(arg: Option<PathBuf>) -> Result<DataDirResolution, String> {
    resolve_with(arg, |key| {
        std::env::var_os(key)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

fn resolve_with(
    arg: Option<PathBuf>,
    env: impl Fn(&str) -> Option<PathBuf>,
) -> Result<DataDirResolution, String> {
    if let Some(dir) = arg {
        return Ok(DataDirResolution {
            dir,
            source: DataDirSource::Argument,
        });
    }
    if let Some(dir) = env(DATA_DIR_ENV) {
        return Ok(DataDirResolution {
            dir,
            source: DataDirSource::Environment,
        });
    }
    if let Some(base) = env("XDG_DATA_HOME") {
        return Ok(DataDirResolution {
            dir: base.join(APP_DIR_NAME),
            source: DataDirSource::XdgDataHome,
        });
    }
    let home = env("HOME").ok_or_else(|| "resolve HOME: not set".to_string())?;
    Ok(DataDirResolution {
        dir: home.join(".local").join("share").join(APP_DIR_NAME),
        source: DataDirSource::Home,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<PathBuf> {
        move |key| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| PathBuf::from(value))
        }
    }

    #[test]
    fn argument_wins_over_environment() {
        let resolved = resolve_with(
            Some(PathBuf::from("/srv/fp")),
            env_of(&[("FOOTPRINT_DATA_DIR", "/env/fp")]),
        )
        .expect("resolve");
        assert_eq!(resolved.dir, PathBuf::from("/srv/fp"));
        assert_eq!(resolved.source, DataDirSource::Argument);
    }

    #[test]
    fn falls_back_through_xdg_then_home() {
        let resolved = resolve_with(None, env_of(&[("XDG_DATA_HOME", "/xdg"), ("HOME", "/home/u")]))
            .expect("resolve");
        assert_eq!(resolved.dir, PathBuf::from("/xdg/carbon-footprint"));

        let resolved = resolve_with(None, env_of(&[("HOME", "/home/u")])).expect("resolve");
        assert_eq!(
            resolved.dir,
            PathBuf::from("/home/u/.local/share/carbon-footprint")
        );
        assert_eq!(resolved.source, DataDirSource::Home);
    }

    #[test]
    fn missing_home_is_an_error() {
        assert!(resolve_with(None, env_of(&[])).is_err());
    }
}
