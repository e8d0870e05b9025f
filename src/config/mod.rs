use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

pub const DEFAULT_FUNCTION: &str = "getFoldersUnderRoot";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .gasrc if exists
        if let Ok(file) = fs::File::open(&config_path) {
            read_rc(BufReader::new(file), &mut map);
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }
}

/// `KEY=VALUE` lines; blank lines and `#` comments are skipped.
fn read_rc<R: BufRead>(reader: R, map: &mut HashMap<String, String>) {
    for line in reader.lines().map_while(Result::ok) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
}

fn is_config_key(k: &str) -> bool {
    // Accept known keys or GAS_* for forward-compat
    const KEYS: &[&str] = &[
        "SCRIPT_ID",
        "SCRIPT_ACCESS_TOKEN",
        "API_BASE_URL",
        "REQUEST_TIMEOUT",
        "DEFAULT_FUNCTION",
        "DEFAULT_COLOR",
        "DEV_MODE",
    ];

    KEYS.contains(&k) || k.starts_with("GAS_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("gas_run").join(".gasrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m.insert("API_BASE_URL".into(), "default".into());
    m.insert("DEFAULT_FUNCTION".into(), DEFAULT_FUNCTION.into());
    m.insert("DEFAULT_COLOR".into(), "green".into());
    m.insert("DEV_MODE".into(), "false".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rc_lines_override_defaults() {
        let mut map = default_map();
        let rc = "# local project\nSCRIPT_ID = 1AbC\n\nREQUEST_TIMEOUT=15\nnot a pair\n";
        read_rc(rc.as_bytes(), &mut map);
        assert_eq!(map.get("SCRIPT_ID").map(String::as_str), Some("1AbC"));
        assert_eq!(map.get("REQUEST_TIMEOUT").map(String::as_str), Some("15"));
        assert_eq!(map.get("DEFAULT_FUNCTION").map(String::as_str), Some(DEFAULT_FUNCTION));
        assert!(!map.contains_key("not a pair"));
    }

    #[test]
    fn rc_file_on_disk_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DEV_MODE=true").unwrap();
        writeln!(file, "API_BASE_URL=http://localhost:9000/").unwrap();

        let mut map = HashMap::new();
        read_rc(BufReader::new(fs::File::open(file.path()).unwrap()), &mut map);
        assert_eq!(map.get("DEV_MODE").map(String::as_str), Some("true"));
        assert_eq!(map.get("API_BASE_URL").map(String::as_str), Some("http://localhost:9000/"));
    }

    #[test]
    fn only_known_or_prefixed_keys_are_taken_from_env() {
        assert!(is_config_key("SCRIPT_ID"));
        assert!(is_config_key("GAS_PROFILE"));
        assert!(!is_config_key("PATH"));
    }

    #[test]
    fn typed_getters_parse_inner_values() {
        let mut inner = default_map();
        inner.insert("GAS_TEST_TIMEOUT".into(), " 30 ".into());
        inner.insert("GAS_TEST_FLAG".into(), "TRUE".into());
        let cfg = Config { inner, config_path: PathBuf::from("/dev/null") };
        assert_eq!(cfg.get_u64("GAS_TEST_TIMEOUT"), Some(30));
        assert!(cfg.get_bool("GAS_TEST_FLAG"));
        assert!(!cfg.get_bool("GAS_TEST_MISSING"));
    }
}
