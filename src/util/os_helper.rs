/// Real name of the OS user, falling back to the login name.
pub fn get_name() -> String {
    let name = whoami::realname();
    if name.is_empty() {
        return whoami::username();
    }
    name
}

/// user@host, used when a comment is written without an email.
pub fn get_email() -> String {
    let host = whoami::fallible::hostname().unwrap_or_else(|_| "localhost".to_string());
    format!("{}@{}", whoami::username(), host.to_lowercase())
}
