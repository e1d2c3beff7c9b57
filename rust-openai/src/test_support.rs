use crate::client::ClientConfig;
use rust_openai_types::ApiType;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn with_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
    let _guard = ENV_LOCK.lock().unwrap();
    let backup: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| ((*key).to_string(), std::env::var(key).ok()))
        .collect();
    for (key, value) in vars {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    f();
    for (key, value) in backup {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

pub fn openai_config(token: &str) -> ClientConfig {
    ClientConfig::openai(token)
}

pub fn azure_config(api_type: ApiType, base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::azure("dummy", base_url);
    config.api_type = api_type;
    config
}
