//! [`SensorProfiles`] – negotiation for one sensor module.
//!
//! Owns one selector per stream class, registers all of them against the
//! module's catalog with the owner's restart hook, and merges their
//! selections into the list of profiles to request from the device.

use streamsel_hal::SensorModule;
use streamsel_params::ParameterRegistry;
use streamsel_types::{Profile, StreamKey, StreamselError};
use tracing::{info, instrument};

use crate::manager::UpdateCallback;
use crate::motion::MotionProfiles;
use crate::pose::PoseProfiles;
use crate::selector::{ProfileSelector, SelectionNotice};
use crate::video::VideoProfiles;

/// Result of one negotiation pass over a module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Negotiation {
    /// Profiles to request, video first, then motion, then pose.
    pub profiles: Vec<Profile>,
    /// One entry per enabled stream that had no exact match.
    pub notices: Vec<SelectionNotice>,
}

/// Video, motion and pose selectors bound to one module.
pub struct SensorProfiles {
    module_name: String,
    selectors: Vec<Box<dyn ProfileSelector>>,
}

impl SensorProfiles {
    /// Enumerate `module` once and register every selector's parameters.
    ///
    /// Video parameters are scoped by the module's parameter prefix, e.g.
    /// `stereo_module.width`.
    ///
    /// # Errors
    ///
    /// Propagates enumeration failures and registry errors such as a
    /// parameter name declared twice.  Registration is not transactional:
    /// names declared before the failure stay in `registry`, still wired to
    /// `on_update`, so the caller should discard the registry along with
    /// the error.
    #[instrument(skip_all, fields(module = module.name()))]
    pub fn register(
        module: &dyn SensorModule,
        registry: &dyn ParameterRegistry,
        on_update: UpdateCallback,
    ) -> Result<Self, StreamselError> {
        let catalog = module.enumerate_profiles()?;
        let mut selectors: Vec<Box<dyn ProfileSelector>> = vec![
            Box::new(VideoProfiles::new(module.parameter_prefix())),
            Box::new(MotionProfiles::new()),
            Box::new(PoseProfiles::new()),
        ];
        for selector in &mut selectors {
            selector.register_profile_parameters(&catalog, registry, on_update.clone())?;
        }
        info!(profiles = catalog.len(), "registered profile parameters");
        Ok(Self {
            module_name: module.name().to_string(),
            selectors,
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Streams whose enable flag currently reads `true`, across all
    /// selectors.
    pub fn enabled_streams(&self) -> Vec<StreamKey> {
        self.selectors
            .iter()
            .flat_map(|s| s.manager().enabled_keys())
            .collect()
    }

    /// Whether any selector has a stream to negotiate.
    pub fn is_any_enabled(&self) -> bool {
        self.selectors.iter().any(|s| s.has_any_enabled_stream())
    }

    /// Run every selector and merge the results.
    pub fn negotiate(&self) -> Negotiation {
        let mut negotiation = Negotiation::default();
        for selector in &self.selectors {
            if !selector.has_any_enabled_stream() {
                continue;
            }
            let notices = selector.select_wanted_profiles(&mut negotiation.profiles);
            negotiation.notices.extend(notices);
        }
        info!(
            module = %self.module_name,
            selected = negotiation.profiles.len(),
            unmatched = negotiation.notices.len(),
            "negotiated profiles"
        );
        negotiation
    }
}
