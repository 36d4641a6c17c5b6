use std::{
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};

const CONFIG_HOME_ENV: &str = "PARASITE_ATLAS_CONFIG_HOME";

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points the app directory at a temp dir for the guard's lifetime.
pub struct AtlasEnvGuard {
    previous: Option<String>,
    _lock: MutexGuard<'static, ()>,
}

impl AtlasEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = std::env::var(CONFIG_HOME_ENV).ok();
        // SAFETY: env mutation is serialized by ENV_LOCK.
        unsafe {
            std::env::set_var(CONFIG_HOME_ENV, path);
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for AtlasEnvGuard {
    fn drop(&mut self) {
        // SAFETY: env mutation is serialized by ENV_LOCK.
        unsafe {
            match self.previous.take() {
                Some(value) => std::env::set_var(CONFIG_HOME_ENV, value),
                None => std::env::remove_var(CONFIG_HOME_ENV),
            }
        }
    }
}
