pub mod server;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        mail_url: Option<String>,
        mail_token: Option<SecretString>,
    },
}
