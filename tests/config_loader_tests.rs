use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;
use vetted_bff::config::{ConfigError, ConfigLoader};

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

const KEYS: &[&str] = &[
    "VETTED_PROFILE",
    "VETTED_API_BIND_ADDR",
    "VETTED_LOG_LEVEL",
    "VETTED_LOG_FORMAT",
    "VETTED_DATABASE_URL",
    "VETTED_DB_MAX_CONNECTIONS",
    "VETTED_DB_ACQUIRE_TIMEOUT_MS",
    "VETTED_AUTO_MIGRATE",
];

fn clear_env() {
    for key in KEYS {
        unsafe {
            env::remove_var(key);
        }
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

fn empty_dir_loader() -> (TempDir, ConfigLoader) {
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    (temp_dir, loader)
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let (_dir, loader) = empty_dir_loader();
    let cfg = loader.load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.log_format, "json");
    assert_eq!(cfg.db_max_connections, 10);
    assert_eq!(cfg.db_acquire_timeout_ms, 5000);
    assert!(cfg.auto_migrate);
    cfg.bind_addr().expect("default bind addr parses");
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "VETTED_API_BIND_ADDR=127.0.0.1:3000\n");
    write_env_file(
        &temp_dir,
        ".env.test",
        "VETTED_API_BIND_ADDR=192.168.0.10:5000\nVETTED_LOG_FORMAT=pretty\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "VETTED_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // Select profile via .env.local before profile-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        "VETTED_PROFILE=test\nVETTED_API_BIND_ADDR=127.0.0.1:4000\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    assert_eq!(cfg.log_format, "pretty");
}

#[test]
fn os_environment_has_highest_precedence() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "VETTED_API_BIND_ADDR=127.0.0.1:3000\nVETTED_DATABASE_URL=sqlite::memory:\n",
    );

    unsafe {
        env::set_var("VETTED_API_BIND_ADDR", "0.0.0.0:9090");
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");
    assert_eq!(cfg.database_url, "sqlite::memory:");

    clear_env();
}

#[test]
fn unprefixed_keys_are_ignored() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "API_BIND_ADDR=10.9.9.9:1\n");

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
}

#[test]
fn auto_migrate_follows_profile_unless_set() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("VETTED_PROFILE", "production");
    }
    let (_dir, loader) = empty_dir_loader();
    assert!(!loader.load().unwrap().auto_migrate);

    unsafe {
        env::set_var("VETTED_AUTO_MIGRATE", "yes");
    }
    assert!(loader.load().unwrap().auto_migrate);

    clear_env();
}

#[test]
fn invalid_bind_addr_returns_error() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("VETTED_API_BIND_ADDR", "not-an-addr");
    }
    let (_dir, loader) = empty_dir_loader();
    let err = loader.load().expect_err("invalid bind addr should fail");
    assert!(format!("{}", err).contains("invalid api bind address"));

    clear_env();
}

#[test]
fn invalid_log_format_and_bool_return_errors() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("VETTED_LOG_FORMAT", "xml");
    }
    let (_dir, loader) = empty_dir_loader();
    assert!(matches!(
        loader.load(),
        Err(ConfigError::InvalidLogFormat { .. })
    ));
    clear_env();

    unsafe {
        env::set_var("VETTED_AUTO_MIGRATE", "sometimes");
    }
    assert!(matches!(
        loader.load(),
        Err(ConfigError::InvalidBool { .. })
    ));

    clear_env();
}
