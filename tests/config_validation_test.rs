use std::io::Write;
use std::time::Duration;

use blackswan::config::{AppConfig, DatabaseConfig, RedisConfig, ENV_VARS};

fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn every_variable_overrides_its_default() {
    let (config, rejected) = AppConfig::from_vars(vars(&[
        ("SERVER_PORT", "9090"),
        ("SERVER_MODE", "release"),
        ("SERVER_READ_TIMEOUT", "5"),
        ("SERVER_WRITE_TIMEOUT", "15"),
        ("SERVER_IDLE_TIMEOUT", "60"),
        ("DB_HOST", "db.internal"),
        ("DB_PORT", "6543"),
        ("DB_USER", "swan"),
        ("DB_PASSWORD", "s3cret"),
        ("DB_NAME", "market"),
        ("DB_SSL_MODE", "require"),
        ("DB_MAX_CONNS", "50"),
        ("DB_MAX_IDLE", "5"),
        ("REDIS_HOST", "cache.internal"),
        ("REDIS_PORT", "6380"),
        ("REDIS_PASSWORD", "hunter2"),
        ("REDIS_DB", "3"),
        ("LLM_PROVIDER", "anthropic"),
        ("LLM_API_KEY", "sk-test"),
        ("LLM_MODEL", "claude-test"),
        ("LLM_BASE_URL", "http://localhost:11434"),
    ]))
    .expect("explicit variables should load");

    assert!(rejected.is_empty());

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.mode, "release");
    assert_eq!(config.server.read_timeout, Duration::from_secs(5));
    assert_eq!(config.server.write_timeout, Duration::from_secs(15));
    assert_eq!(config.server.idle_timeout, Duration::from_secs(60));

    assert_eq!(
        config.database,
        DatabaseConfig {
            host: "db.internal".into(),
            port: 6543,
            user: "swan".into(),
            password: "s3cret".into(),
            name: "market".into(),
            ssl_mode: "require".into(),
            max_conns: 50,
            max_idle: 5,
        }
    );

    assert_eq!(
        config.redis,
        RedisConfig {
            host: "cache.internal".into(),
            port: 6380,
            password: "hunter2".into(),
            db: 3,
        }
    );

    assert_eq!(config.llm.provider, "anthropic");
    assert_eq!(config.llm.api_key, "sk-test");
    assert_eq!(config.llm.model, "claude-test");
    assert_eq!(config.llm.base_url_override(), Some("http://localhost:11434"));
}

#[test]
fn absent_variables_use_documented_defaults() {
    let (config, _) = AppConfig::from_vars(config::Map::new()).unwrap();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.mode, "debug");
    assert_eq!(config.server.read_timeout, Duration::from_secs(10));
    assert_eq!(config.server.write_timeout, Duration::from_secs(10));
    assert_eq!(config.server.idle_timeout, Duration::from_secs(120));

    assert_eq!(config.database.host, "localhost");
    assert_eq!(config.database.port, 5432);
    assert_eq!(config.database.user, "postgres");
    assert_eq!(config.database.password, "");
    assert_eq!(config.database.name, "blackswan");
    assert_eq!(config.database.ssl_mode, "disable");
    assert_eq!(config.database.max_conns, 25);
    assert_eq!(config.database.max_idle, 10);

    assert_eq!(config.redis.host, "localhost");
    assert_eq!(config.redis.port, 6379);
    assert_eq!(config.redis.password, "");
    assert_eq!(config.redis.db, 0);

    assert_eq!(config.llm.provider, "openai");
    assert_eq!(config.llm.api_key, "");
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.llm.base_url, "");
}

#[test]
fn invalid_db_port_falls_back_to_default() {
    let (config, rejected) = AppConfig::from_vars(vars(&[("DB_PORT", "invalid")]))
        .expect("malformed integers must not fail the load");

    assert_eq!(config.database, DatabaseConfig::default());
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].name, "DB_PORT");
    assert_eq!(rejected[0].value, "invalid");
}

#[test]
fn every_integer_variable_tolerates_garbage() {
    let integer_vars = [
        "SERVER_PORT",
        "SERVER_READ_TIMEOUT",
        "SERVER_WRITE_TIMEOUT",
        "SERVER_IDLE_TIMEOUT",
        "DB_PORT",
        "DB_MAX_CONNS",
        "DB_MAX_IDLE",
        "REDIS_PORT",
        "REDIS_DB",
    ];
    let pairs: Vec<(&str, &str)> = integer_vars.iter().map(|name| (*name, "ten")).collect();

    let (config, rejected) = AppConfig::from_vars(vars(&pairs)).unwrap();
    let (defaults, _) = AppConfig::from_vars(config::Map::new()).unwrap();

    assert_eq!(rejected.len(), integer_vars.len());
    assert_eq!(config.server, defaults.server);
    assert_eq!(config.database, defaults.database);
    assert_eq!(config.redis, defaults.redis);
}

#[test]
fn unknown_variables_are_ignored() {
    let (config, rejected) =
        AppConfig::from_vars(vars(&[("DATABASE_URL", "postgres://elsewhere")])).unwrap();

    assert!(rejected.is_empty());
    assert_eq!(config.database, DatabaseConfig::default());
    assert!(!ENV_VARS.contains(&"DATABASE_URL"));
}

#[test]
fn dsn_is_formatted_verbatim() {
    let db = DatabaseConfig {
        host: "db host".into(),
        port: 15432,
        user: "o'brien".into(),
        password: "p@ss word=1".into(),
        name: "black swan".into(),
        ssl_mode: "verify-full".into(),
        ..Default::default()
    };

    assert_eq!(
        db.dsn(),
        "host=db host port=15432 user=o'brien password=p@ss word=1 dbname=black swan sslmode=verify-full"
    );
    assert_eq!(
        DatabaseConfig::default().dsn(),
        "host=localhost port=5432 user=postgres password= dbname=blackswan sslmode=disable"
    );
}

#[test]
fn redis_addr_joins_host_and_port() {
    let redis = RedisConfig {
        host: "10.0.0.7".into(),
        port: 7000,
        ..Default::default()
    };

    assert_eq!(redis.addr(), "10.0.0.7:7000");
    assert_eq!(RedisConfig::default().addr(), "localhost:6379");
}

#[test]
fn env_file_bootstraps_settings() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# local overrides").unwrap();
    writeln!(file, "SERVER_PORT=3001").unwrap();
    writeln!(file, "DB_NAME=swan_dev").unwrap();
    writeln!(file, "REDIS_DB=not-a-number").unwrap();
    file.flush().unwrap();

    let (config, rejected) = AppConfig::from_env_file(file.path()).unwrap();

    assert_eq!(config.server.port, 3001);
    assert_eq!(config.database.name, "swan_dev");
    assert_eq!(config.redis.db, 0);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].name, "REDIS_DB");
}

#[test]
fn missing_env_file_is_an_error_for_explicit_paths() {
    let dir = tempfile::tempdir().unwrap();
    let result = AppConfig::from_env_file(dir.path().join("absent.env"));

    assert!(result.is_err());
}

#[test]
fn load_reads_process_environment() {
    // LLM_MODEL is not read from the process by any other test in this binary.
    std::env::set_var("LLM_MODEL", "gpt-from-process-env");

    let config = AppConfig::load().expect("load never fails on the process environment");

    assert_eq!(config.llm.model, "gpt-from-process-env");
    std::env::remove_var("LLM_MODEL");
}
