//! Outgoing account emails

use platform::mail::EmailMessage;

use crate::application::config::AuthConfig;

/// Base URL for links: configured value, else `https://<host>`
pub fn link_base(config: &AuthConfig, host: Option<&str>) -> String {
    match (&config.public_base_url, host) {
        (Some(base), _) => base.trim_end_matches('/').to_string(),
        (None, Some(host)) => format!("https://{}", host),
        (None, None) => "https://localhost".to_string(),
    }
}

pub fn registration_email(to: &str, base: &str, code: &str) -> EmailMessage {
    let link = format!("{}/confirm-email?code={}", base, code);
    EmailMessage {
        to: to.to_string(),
        subject: "Finish your registration".to_string(),
        html: format!(
            "<h1>Thank for your registration</h1>\
             <p>To finish registration please follow the link below:\
             <a href='{}'>complete registration</a></p>",
            link
        ),
    }
}

pub fn recovery_email(to: &str, base: &str, code: &str) -> EmailMessage {
    let link = format!("{}/password-recovery?recoveryCode={}", base, code);
    EmailMessage {
        to: to.to_string(),
        subject: "Password recovery".to_string(),
        html: format!(
            "<h1>Password recovery</h1>\
             <p>To finish password recovery please follow the link below:\
             <a href='{}'>recovery password</a></p>",
            link
        ),
    }
}
