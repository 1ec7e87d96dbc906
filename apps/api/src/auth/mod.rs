// Accounts and sessions: password hashing, signed session tokens, auth endpoints.

pub mod handlers;
pub mod password;
pub mod session;

/// Masks an email for safe logging: `asha@example.com` → `a***@example.com`.
pub fn safe_email_log(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        _ => "***@***".to_string(),
    }
}
