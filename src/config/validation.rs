//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::collections::HashSet;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.name must not contain spaces: '{0}'")]
    InvalidServerName(String),
    #[error("server.password must not be empty when set")]
    EmptyPassword,
    #[error("server.all_traffic_channel must start with '&' and contain no space or comma: '{0}'")]
    InvalidAllTrafficChannel(String),
    #[error("duplicate group id in backend roster: {0}")]
    DuplicateGroup(String),
    #[error("duplicate buddy id in backend roster: {0}")]
    DuplicateBuddy(String),
    #[error("duplicate member id {member} in group {group}")]
    DuplicateMember { group: String, member: String },
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let server = &config.server;

    if server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    } else if server.name.contains(' ') {
        errors.push(ValidationError::InvalidServerName(server.name.clone()));
    }

    if server.password.as_deref() == Some("") {
        errors.push(ValidationError::EmptyPassword);
    }

    let chan = &server.all_traffic_channel;
    if chan.len() < 2 || !chan.starts_with('&') || chan.contains([' ', ',']) {
        errors.push(ValidationError::InvalidAllTrafficChannel(chan.clone()));
    }

    let mut seen = HashSet::new();
    for group in &config.backend.groups {
        let Some(id) = &group.id else { continue };
        if !seen.insert(id) {
            errors.push(ValidationError::DuplicateGroup(id.clone()));
        }

        let mut members = HashSet::new();
        for member in group.members.iter().filter_map(|m| m.id.as_ref()) {
            if !members.insert(member) {
                errors.push(ValidationError::DuplicateMember {
                    group: id.clone(),
                    member: member.clone(),
                });
            }
        }
    }

    let mut seen = HashSet::new();
    for id in config.backend.buddies.iter().filter_map(|b| b.id.as_ref()) {
        if !seen.insert(id) {
            errors.push(ValidationError::DuplicateBuddy(id.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn defaults_pass() {
        assert!(validate(&parse("")).is_ok());
    }

    #[test]
    fn empty_server_name_fails() {
        let errors = validate(&parse("[server]\nname = \"\"\n")).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingServerName)));
    }

    #[test]
    fn server_name_with_space_fails() {
        let errors = validate(&parse("[server]\nname = \"qq bot\"\n")).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidServerName(_))));
    }

    #[test]
    fn empty_password_fails() {
        let errors = validate(&parse("[server]\npassword = \"\"\n")).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::EmptyPassword)));
    }

    #[test]
    fn all_traffic_channel_needs_ampersand() {
        for bad in ["#qq", "&", "&q q", "&a,b"] {
            let doc = format!("[server]\nall_traffic_channel = \"{bad}\"\n");
            let errors = validate(&parse(&doc)).unwrap_err();
            assert!(
                errors
                    .iter()
                    .any(|e| matches!(e, ValidationError::InvalidAllTrafficChannel(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn duplicate_roster_ids_fail() {
        let doc = r#"
[[backend.groups]]
id = "1"
nick = "a"
members = [{ id = "5", name = "x" }, { id = "5", name = "y" }]

[[backend.groups]]
id = "1"
nick = "b"

[[backend.buddies]]
id = "7"
name = "p"

[[backend.buddies]]
id = "7"
name = "q"
"#;
        let errors = validate(&parse(doc)).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateGroup(id) if id == "1")));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateBuddy(id) if id == "7")));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateMember { .. })));
    }

    #[test]
    fn entries_without_ids_are_not_duplicates() {
        let doc = r#"
[[backend.buddies]]
name = "ghost"

[[backend.buddies]]
name = "ghost"
"#;
        assert!(validate(&parse(doc)).is_ok());
    }
}
