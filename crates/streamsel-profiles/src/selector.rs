//! [`ProfileSelector`] – the matching contract every stream class implements,
//! and the single selection pass written against it.
//!
//! # Selection pass
//!
//! The catalog is walked once.  Every enabled [`StreamKey`] moves through
//! an explicit [`KeyState`]:
//!
//! ```text
//! (unseen) ──first profile──▶ Pending { default } ──wanted profile──▶ Satisfied
//!                                   │
//!                             end of catalog
//!                                   ▼
//!                 default seen?  yes → substituted   no → unmatched
//! ```
//!
//! The first wanted profile of a key wins; later catalog entries for a
//! satisfied key are ignored.  Keys that end the pass pending degrade to the
//! manufacturer default or are dropped, and each such key yields one
//! [`SelectionNotice`] plus a warning.  The pass itself never fails.

use std::collections::BTreeMap;
use std::fmt;

use streamsel_params::ParameterRegistry;
use streamsel_types::{Catalog, ParamError, Profile, StreamKey};
use tracing::{debug, warn};

use crate::manager::{ProfileManager, UpdateCallback, describe_profile};

/// Matching behaviour of one class of streams (video, motion or pose).
pub trait ProfileSelector: Send + Sync {
    /// Shared catalog and enable-flag state.
    fn manager(&self) -> &ProfileManager;

    /// Take this selector's share of `all_profiles` and register its dynamic
    /// parameters.  `on_update` is the owner's restart hook.
    fn register_profile_parameters(
        &mut self,
        all_profiles: &Catalog,
        registry: &dyn ParameterRegistry,
        on_update: UpdateCallback,
    ) -> Result<(), ParamError>;

    /// Whether `profile` satisfies the desired attributes.  Accepts every
    /// profile unless overridden.
    fn is_wanted_profile(&self, _profile: &Profile) -> bool {
        true
    }

    /// Rendering of the desired attributes of `key`, used in diagnostics.
    fn describe_wanted(&self, key: StreamKey) -> String;

    /// Whether this selector currently has a stream to negotiate.
    fn has_any_enabled_stream(&self) -> bool {
        self.manager().has_enabled_flags()
    }

    /// Append the negotiated profiles to `wanted` and return one notice per
    /// enabled stream that had no exact match.
    fn select_wanted_profiles(&self, wanted: &mut Vec<Profile>) -> Vec<SelectionNotice> {
        select_wanted(self, wanted)
    }
}

/// Per-key progress through the selection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyState<'a> {
    /// Seen but not matched yet; remembers the latest default profile.
    Pending { default: Option<&'a Profile> },
    /// A wanted profile was selected.
    Satisfied,
}

/// Diagnostic for an enabled stream without an exact match.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionNotice {
    /// The manufacturer default was selected instead.
    DefaultSubstituted {
        key: StreamKey,
        wanted: String,
        default: Profile,
    },
    /// No default exists; the stream is absent from the selection.
    NoDefault { key: StreamKey, wanted: String },
}

impl SelectionNotice {
    pub fn key(&self) -> StreamKey {
        match self {
            SelectionNotice::DefaultSubstituted { key, .. } | SelectionNotice::NoDefault { key, .. } => {
                *key
            }
        }
    }
}

impl fmt::Display for SelectionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionNotice::DefaultSubstituted { wanted, default, .. } => write!(
                f,
                "Could not find a match for profile: {wanted} : Using Default: {}",
                describe_profile(default)
            ),
            SelectionNotice::NoDefault { wanted, .. } => {
                write!(f, "Could not find a match for profile: {wanted} : No default.")
            }
        }
    }
}

/// Run the selection pass of `selector` over its catalog.
pub fn select_wanted<S: ProfileSelector + ?Sized>(
    selector: &S,
    wanted: &mut Vec<Profile>,
) -> Vec<SelectionNotice> {
    let manager = selector.manager();
    let mut states: BTreeMap<StreamKey, KeyState<'_>> = BTreeMap::new();

    for profile in manager.catalog() {
        let key = profile.key();
        if !manager.is_enabled(key) {
            continue;
        }
        let state = states
            .entry(key)
            .or_insert(KeyState::Pending { default: None });
        let KeyState::Pending { default } = state else {
            continue;
        };
        if profile.is_default {
            *default = Some(profile);
        }
        if selector.is_wanted_profile(profile) {
            wanted.push(profile.clone());
            *state = KeyState::Satisfied;
            debug!("Found profile for {}:{}", key.kind, key.index);
        }
    }

    let mut notices = Vec::new();
    for (key, state) in states {
        let KeyState::Pending { default } = state else {
            continue;
        };
        let wanted_desc = selector.describe_wanted(key);
        let notice = match default {
            Some(profile) => {
                wanted.push(profile.clone());
                SelectionNotice::DefaultSubstituted {
                    key,
                    wanted: wanted_desc,
                    default: profile.clone(),
                }
            }
            None => SelectionNotice::NoDefault {
                key,
                wanted: wanted_desc,
            },
        };
        warn!(stream = %key, "{notice}");
        notices.push(notice);
    }
    notices
}
