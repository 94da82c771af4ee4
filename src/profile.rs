use plannercell_config::ProfileConfig;
use plannercell_core::{Plan, Profile, ProfileProvider};
use tracing::warn;

/// Reads the subscription profile stored in the user configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredProfile {
    stored: Option<ProfileConfig>,
}

impl ConfiguredProfile {
    pub fn new(stored: Option<ProfileConfig>) -> Self {
        Self { stored }
    }
}

impl ProfileProvider for ConfiguredProfile {
    fn profile(&self) -> Option<Profile> {
        let stored = self.stored.as_ref()?;
        match Plan::parse(&stored.plan) {
            Some(plan) => Some(Profile {
                plan,
                expiration: stored.expiration,
            }),
            None => {
                warn!(plan = %stored.plan, "unknown plan in configuration, treating as free");
                Some(Profile {
                    plan: Plan::Free,
                    expiration: None,
                })
            }
        }
    }
}
