use crate::api;
use crate::cli::actions::Action;
use crate::email::{HttpMailer, LogMailer, Mailer};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            mail_url,
            mail_token,
        } => {
            // Without a relay URL, mail is logged instead of delivered.
            let mailer: Arc<dyn Mailer> = match mail_url {
                Some(url) => Arc::new(HttpMailer::new(url, mail_token)?),
                None => {
                    warn!("no mail relay configured, logging outbound mail");
                    Arc::new(LogMailer)
                }
            };

            api::new(port, dsn, mailer).await?;
        }
    }

    Ok(())
}
