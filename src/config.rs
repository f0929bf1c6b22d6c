//! Where to find the driver module and which board to talk to.

use std::env;
use std::path::PathBuf;

use crate::{Error, Result};

pub const DEFAULT_LIBRARY: &str = "liblcomp.so";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Path to the driver module, as passed to `dlopen`.
    pub library_path: String,
    /// Virtual slot number of the board.
    pub slot: u32,
    /// Firmware image to load after opening; boards with firmware in flash need none.
    pub bios: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            library_path: DEFAULT_LIBRARY.to_owned(),
            slot: 0,
            bios: None,
        }
    }
}

impl Configuration {
    /// Defaults, overridden by `LCOMP_LIBRARY`, `LCOMP_SLOT` and `LCOMP_BIOS` where set.
    pub fn from_env() -> Result<Configuration> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Configuration> {
        let mut config = Self::default();
        if let Some(path) = lookup("LCOMP_LIBRARY") {
            config.library_path = path;
        }
        if let Some(slot) = lookup("LCOMP_SLOT") {
            config.slot = slot.trim().parse()
                .map_err(|error| Error::Other(format!("LCOMP_SLOT={:?}: {}", slot, error).into()))?;
        }
        if let Some(bios) = lookup("LCOMP_BIOS") {
            config.bios = Some(PathBuf::from(bios));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::from_lookup(|_| None).unwrap();
        assert_eq!(config, Configuration::default());
        assert_eq!(config.library_path, "liblcomp.so");
    }

    #[test]
    fn test_overrides() {
        let config = Configuration::from_lookup(|name| match name {
            "LCOMP_SLOT" => Some(" 2 ".to_owned()),
            "LCOMP_BIOS" => Some("/usr/share/lcomp/e440".to_owned()),
            _ => None,
        }).unwrap();
        assert_eq!(config.slot, 2);
        assert_eq!(config.bios, Some(PathBuf::from("/usr/share/lcomp/e440")));
        assert_eq!(config.library_path, DEFAULT_LIBRARY);
    }

    #[test]
    fn test_bad_slot() {
        let result = Configuration::from_lookup(|name| {
            (name == "LCOMP_SLOT").then(|| "first".to_owned())
        });
        assert!(matches!(result, Err(Error::Other(_))));
    }
}
