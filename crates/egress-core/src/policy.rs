//! Occupant profiles and the search-admissibility policy they map to.
//!
//! The profile is a capability tag, not a hierarchy: it drives policy
//! selection through one explicit table ([`UserProfile::search_policy`])
//! and nothing else.

// ── UserProfile ───────────────────────────────────────────────────────────────

/// Mobility capability class of the occupant being routed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UserProfile {
    /// Fully mobile adult (default).
    #[default]
    Standard,
    Elderly,
    Child,
    /// Wheelchair user or otherwise mobility-impaired.
    Disabled,
}

impl UserProfile {
    /// Profiles that should trigger an assistance signal and receive
    /// accessibility-biased routing.
    #[inline]
    pub fn is_vulnerable(self) -> bool {
        !matches!(self, UserProfile::Standard)
    }

    /// The fixed profile → policy table.
    ///
    /// | Profile                  | Policy                          |
    /// |--------------------------|---------------------------------|
    /// | Standard                 | default (hazard avoidance only) |
    /// | Elderly, Child, Disabled | accessibility-biased            |
    pub fn search_policy(self) -> SearchPolicy {
        match self {
            UserProfile::Standard => SearchPolicy::default(),
            UserProfile::Elderly | UserProfile::Child | UserProfile::Disabled => {
                SearchPolicy::accessibility_biased()
            }
        }
    }
}

// ── SearchPolicy ──────────────────────────────────────────────────────────────

/// The closed set of search-admissibility flags.
///
/// Hazard flags (`avoid_fire`, `avoid_congestion`) gate the obstacle-field
/// containment tests; the remaining flags gate edge/node attribute checks
/// inside the search itself.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchPolicy {
    pub avoid_fire: bool,
    pub avoid_congestion: bool,
    /// Soft bias: edges into nodes without the accessible flag cost more.
    pub prefer_accessible: bool,
    pub avoid_steep_slopes: bool,
    pub avoid_narrow_paths: bool,
    /// Hard restriction: only accessibility-flagged nodes are expanded.
    pub strict_accessible: bool,
}

impl Default for SearchPolicy {
    /// Hazard avoidance on, accessibility options off.
    fn default() -> Self {
        Self {
            avoid_fire: true,
            avoid_congestion: true,
            prefer_accessible: false,
            avoid_steep_slopes: false,
            avoid_narrow_paths: false,
            strict_accessible: false,
        }
    }
}

impl SearchPolicy {
    /// Policy for vulnerable profiles: hazard avoidance plus every soft
    /// accessibility option.  `strict_accessible` stays off — it is only
    /// enabled by the accessibility filter's re-planning pass.
    pub fn accessibility_biased() -> Self {
        Self {
            prefer_accessible: true,
            avoid_steep_slopes: true,
            avoid_narrow_paths: true,
            ..Self::default()
        }
    }

    /// Copy of `self` with the strict-accessible restriction enabled.
    pub fn strict(mut self) -> Self {
        self.strict_accessible = true;
        self
    }
}
