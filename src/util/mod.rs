use std::sync::atomic::{AtomicUsize, Ordering};

use directories::ProjectDirs;

pub mod assets;
pub mod persistence;
pub mod version;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "CourierDesk";
const APP_DIR_NAME: &str = "CourierDesk";

static ID_COUNTER: AtomicUsize = AtomicUsize::new(1);

pub fn generate_id(prefix: &str) -> String {
    let value = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{value}")
}

/// Platform directories for config and the wizard draft.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_per_call() {
        let first = generate_id("toast");
        let second = generate_id("toast");
        assert!(first.starts_with("toast-"));
        assert_ne!(first, second);
    }
}
