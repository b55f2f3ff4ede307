use std::{
    env, fmt,
    net::{AddrParseError, SocketAddr},
    time::Duration,
};

use core_sim::RelaunchPolicy;
use runtime::{DEFAULT_TICKS_PER_RUN, DEFAULT_TICK_INTERVAL};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

const ADDR_KEY: &str = "TERMINAL_SERVER_ADDR";
const TICK_INTERVAL_KEY: &str = "TERMINAL_TICK_INTERVAL_MS";
const TICKS_PER_RUN_KEY: &str = "TERMINAL_TICKS_PER_RUN";
const PRICE_SEED_KEY: &str = "TERMINAL_PRICE_SEED";
const RELAUNCH_POLICY_KEY: &str = "TERMINAL_RELAUNCH_POLICY";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub tick_interval: Duration,
    pub ticks_per_run: u32,
    pub price_seed: Option<u64>,
    pub relaunch_policy: RelaunchPolicy,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidListenAddr(AddrParseError),
    InvalidTickInterval,
    InvalidTicksPerRun,
    InvalidPriceSeed,
    InvalidRelaunchPolicy,
    NonUnicodeListenAddr,
    NonUnicodeTickInterval,
    NonUnicodeTicksPerRun,
    NonUnicodePriceSeed,
    NonUnicodeRelaunchPolicy,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidListenAddr(err) => {
                write!(f, "{ADDR_KEY} is not a valid socket address: {err}")
            }
            Self::InvalidTickInterval => {
                write!(f, "{TICK_INTERVAL_KEY} must be a whole number of milliseconds")
            }
            Self::InvalidTicksPerRun => {
                write!(f, "{TICKS_PER_RUN_KEY} must be a positive integer")
            }
            Self::InvalidPriceSeed => {
                write!(f, "{PRICE_SEED_KEY} must be an unsigned 64-bit integer")
            }
            Self::InvalidRelaunchPolicy => {
                write!(f, "{RELAUNCH_POLICY_KEY} must be one of: continue, reset")
            }
            Self::NonUnicodeListenAddr => write!(f, "{ADDR_KEY} contains non-unicode data"),
            Self::NonUnicodeTickInterval => {
                write!(f, "{TICK_INTERVAL_KEY} contains non-unicode data")
            }
            Self::NonUnicodeTicksPerRun => {
                write!(f, "{TICKS_PER_RUN_KEY} contains non-unicode data")
            }
            Self::NonUnicodePriceSeed => write!(f, "{PRICE_SEED_KEY} contains non-unicode data"),
            Self::NonUnicodeRelaunchPolicy => {
                write!(f, "{RELAUNCH_POLICY_KEY} contains non-unicode data")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidListenAddr(err) => Some(err),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match env::var(ADDR_KEY) {
            Ok(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            Err(env::VarError::NotPresent) => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeListenAddr);
            }
        };

        let tick_interval = match read_env(TICK_INTERVAL_KEY, ConfigError::NonUnicodeTickInterval)? {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidTickInterval)?,
            None => DEFAULT_TICK_INTERVAL,
        };

        let ticks_per_run = match read_env(TICKS_PER_RUN_KEY, ConfigError::NonUnicodeTicksPerRun)? {
            Some(value) => match value.parse::<u32>() {
                Ok(ticks) if ticks > 0 => ticks,
                _ => return Err(ConfigError::InvalidTicksPerRun),
            },
            None => DEFAULT_TICKS_PER_RUN,
        };

        let price_seed = read_env(PRICE_SEED_KEY, ConfigError::NonUnicodePriceSeed)?
            .map(|value| value.parse::<u64>())
            .transpose()
            .map_err(|_| ConfigError::InvalidPriceSeed)?;

        let relaunch_policy =
            match read_env(RELAUNCH_POLICY_KEY, ConfigError::NonUnicodeRelaunchPolicy)? {
                Some(value) => RelaunchPolicy::parse(value.as_str())
                    .ok_or(ConfigError::InvalidRelaunchPolicy)?,
                None => RelaunchPolicy::default(),
            };

        Ok(Self {
            listen_addr,
            tick_interval,
            ticks_per_run,
            price_seed,
            relaunch_policy,
        })
    }
}

fn read_env(key: &str, non_unicode_error: ConfigError) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(non_unicode_error),
    }
}

#[cfg(test)]
mod tests {
    use std::{env, sync::Mutex, time::Duration};

    use core_sim::RelaunchPolicy;

    use super::{
        Config, ConfigError, ADDR_KEY, PRICE_SEED_KEY, RELAUNCH_POLICY_KEY, TICKS_PER_RUN_KEY,
        TICK_INTERVAL_KEY,
    };

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }

        fn unset(key: &'static str) -> Self {
            let previous = env::var_os(key);
            env::remove_var(key);
            Self { key, previous }
        }

        #[cfg(unix)]
        fn set_os(key: &'static str, value: std::ffi::OsString) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.previous.take() {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    fn reset_config_env_baseline() -> [EnvVarGuard; 5] {
        [
            EnvVarGuard::unset(ADDR_KEY),
            EnvVarGuard::unset(TICK_INTERVAL_KEY),
            EnvVarGuard::unset(TICKS_PER_RUN_KEY),
            EnvVarGuard::unset(PRICE_SEED_KEY),
            EnvVarGuard::unset(RELAUNCH_POLICY_KEY),
        ]
    }

    #[test]
    fn defaults_when_env_is_unset() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.tick_interval, Duration::from_millis(400));
        assert_eq!(config.ticks_per_run, 100);
        assert_eq!(config.price_seed, None);
        assert_eq!(config.relaunch_policy, RelaunchPolicy::Continue);
    }

    #[test]
    fn uses_overrides_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _addr = EnvVarGuard::set(ADDR_KEY, "127.0.0.1:9090");
        let _interval = EnvVarGuard::set(TICK_INTERVAL_KEY, "0");
        let _ticks = EnvVarGuard::set(TICKS_PER_RUN_KEY, "25");
        let _seed = EnvVarGuard::set(PRICE_SEED_KEY, "42");
        let _policy = EnvVarGuard::set(RELAUNCH_POLICY_KEY, "reset");

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.tick_interval, Duration::ZERO);
        assert_eq!(config.ticks_per_run, 25);
        assert_eq!(config.price_seed, Some(42));
        assert_eq!(config.relaunch_policy, RelaunchPolicy::Reset);
    }

    #[test]
    fn returns_error_for_invalid_listen_address_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ADDR_KEY, "not-an-addr");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidListenAddr(_)));
    }

    #[test]
    fn rejects_zero_ticks_per_run() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(TICKS_PER_RUN_KEY, "0");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidTicksPerRun));
    }

    #[test]
    fn rejects_malformed_numeric_overrides() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        {
            let _guard = EnvVarGuard::set(TICK_INTERVAL_KEY, "-5");
            assert!(matches!(
                Config::from_env().unwrap_err(),
                ConfigError::InvalidTickInterval
            ));
        }
        {
            let _guard = EnvVarGuard::set(PRICE_SEED_KEY, "seed");
            assert!(matches!(
                Config::from_env().unwrap_err(),
                ConfigError::InvalidPriceSeed
            ));
        }
    }

    #[test]
    fn rejects_unknown_relaunch_policy() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(RELAUNCH_POLICY_KEY, "restart");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidRelaunchPolicy));
        assert_eq!(
            err.to_string(),
            "TERMINAL_RELAUNCH_POLICY must be one of: continue, reset"
        );
    }

    #[cfg(unix)]
    #[test]
    fn returns_error_for_non_unicode_ticks_per_run() {
        use std::os::unix::ffi::OsStringExt;

        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set_os(TICKS_PER_RUN_KEY, std::ffi::OsString::from_vec(vec![0x66, 0x80]));

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::NonUnicodeTicksPerRun));
    }
}
