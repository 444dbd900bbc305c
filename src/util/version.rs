pub const APP_NAME: &str = "Courier Desk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// Sent with every backend request.
pub fn user_agent() -> String {
    format!("courier-desk/{}", version_label().trim_start_matches('v'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_names_the_app() {
        assert!(user_agent().starts_with("courier-desk/"));
        assert!(!version_label().is_empty());
    }
}
