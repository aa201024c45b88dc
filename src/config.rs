use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Root of the remote mailbox service.
    pub base_url: String,
    /// Where the browser lands after sign-in (`...?user_id=`).
    pub redirect_listen: String,
    pub request_timeout_secs: u64,
    pub login_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            redirect_listen: "127.0.0.1:5173".to_string(),
            request_timeout_secs: 30,
            login_timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }

    pub fn redirect_addr(&self) -> Result<SocketAddr> {
        self.redirect_listen
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid redirect_listen '{}': {e}", self.redirect_listen))
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("rs_mail_dashboard"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        // write the defaults out so there is something to edit
        let cfg = Config::default();
        fs::write(&path, toml::to_string_pretty(&cfg)?)?;
        log::info!("created default config at {}", path.display());
        return Ok(cfg);
    }
    parse_config(&fs::read_to_string(path)?)
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg = parse_config("base_url = \"https://mail.example.com\"\n").unwrap();
        assert_eq!(cfg.base_url, "https://mail.example.com");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.redirect_addr().unwrap().port(), 5173);
    }

    #[test]
    fn bad_listen_address_is_reported() {
        let cfg = parse_config("redirect_listen = \"localhost\"").unwrap();
        assert!(cfg.redirect_addr().is_err());
    }
}
