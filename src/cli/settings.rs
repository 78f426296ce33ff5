//! `config`: show or persist client settings

use anyhow::Result;

use crate::config::Config;

/// Changes requested on the command line; unset fields keep their value.
#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub server_url: Option<String>,
    pub testing: Option<bool>,
    pub request_timeout_secs: Option<u64>,
    pub client_name: Option<String>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.server_url.is_none()
            && self.testing.is_none()
            && self.request_timeout_secs.is_none()
            && self.client_name.is_none()
    }

    /// Apply to `config`. An empty server URL clears the explicit setting.
    pub fn apply(self, config: &mut Config) {
        if let Some(url) = self.server_url {
            let url = url.trim().trim_end_matches('/').to_string();
            config.server_url = (!url.is_empty()).then_some(url);
        }
        if let Some(testing) = self.testing {
            config.testing = testing;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs.max(1);
        }
        if let Some(name) = self.client_name {
            config.client_name = name;
        }
    }
}

/// Print the saved configuration, or update and save it.
pub fn run(update: ConfigUpdate) -> Result<()> {
    let mut config = Config::load()?;
    if !update.is_empty() {
        update.apply(&mut config);
        config.save()?;
        println!("Configuration saved.");
    }

    println!("Server:   {}", config.server_origin());
    println!(
        "Explicit: {}",
        config.server_url.as_deref().unwrap_or("(not set)")
    );
    println!("Testing:  {}", config.testing);
    println!("Timeout:  {}s", config.request_timeout_secs);
    println!("Client:   {}", config.client_name);
    Ok(())
}
