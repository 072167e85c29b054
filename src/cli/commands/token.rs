use anyhow::Context;
use serde_json::json;

use crate::auth::SessionKeys;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub fn handle(config: &AppConfig, user: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let keys = SessionKeys::from_config(&config.session);
    let token = keys.issue(user).context("failed to mint session token")?;

    match output_format {
        OutputFormat::Json => {
            let body = json!({
                "status": "success",
                "data": [{
                    "user": user,
                    "token": token,
                    "cookie": keys.cookie_name(),
                    "expires_in_hours": config.session.expiry_hours
                }]
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
