use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::info;
use ucc_context::UseCaseContext;
use ucc_types::{Dimension, RoutingTable};

use crate::catalog::SecurityPreset;

/// A composed bundle of security dimensions and routing.
///
/// Profiles are values: [`merge`](Self::merge) returns a new profile and
/// leaves both inputs untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SecurityProfile {
    dimensions: Vec<Dimension>,
    routing: RoutingTable,
    presets: Vec<String>,
}

impl SecurityProfile {
    pub fn new(dimensions: Vec<Dimension>, routing: RoutingTable, presets: Vec<String>) -> Self {
        Self {
            dimensions,
            routing,
            presets,
        }
    }

    pub fn from_preset(preset: &SecurityPreset) -> Self {
        Self::new(
            preset.dimensions.clone(),
            preset.routing.clone(),
            vec![preset.name.clone()],
        )
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// Source preset names, first occurrence order.
    pub fn presets(&self) -> &[String] {
        &self.presets
    }

    /// Look up a profile dimension by name.
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name() == name)
    }

    /// Combine two profiles.
    ///
    /// Dimensions dedupe by name with `self` winning, routing entries from
    /// `other` override on collision, and preset names keep their first
    /// position.
    pub fn merge(&self, other: &SecurityProfile) -> SecurityProfile {
        let mut seen = HashSet::new();
        let dimensions = self
            .dimensions
            .iter()
            .chain(&other.dimensions)
            .filter(|d| seen.insert(d.name().to_string()))
            .cloned()
            .collect();

        let mut seen = HashSet::new();
        let presets = self
            .presets
            .iter()
            .chain(&other.presets)
            .filter(|p| seen.insert(p.as_str()))
            .cloned()
            .collect();

        SecurityProfile {
            dimensions,
            routing: self.routing.merged(&other.routing),
            presets,
        }
    }
}

impl fmt::Display for SecurityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let presets: Vec<String> = self.presets.iter().map(|p| format!("{:?}", p)).collect();
        write!(
            f,
            "SecurityProfile(dimensions={}, presets=[{}])",
            self.dimensions.len(),
            presets.join(", ")
        )
    }
}

/// Overlay a profile's routing onto a use case; profile entries win.
///
/// The use case gets a fresh routing table, so any table it shared with
/// other use cases is left as it was.
pub fn apply_security_profile(ctx: &mut UseCaseContext, profile: &SecurityProfile) {
    let merged = ctx.routing().merged(profile.routing());
    info!(
        use_case = %ctx.name,
        presets = ?profile.presets(),
        routes = merged.len(),
        "Security profile applied"
    );
    ctx.set_routing(Arc::new(merged));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{tpn_preset, vfx_preset};
    use proptest::prelude::*;
    use ucc_types::{custom_dimension, default_routing, RiskLevel};

    #[test]
    fn merge_is_idempotent_on_dimensions() {
        let tpn = SecurityProfile::from_preset(&tpn_preset());
        let twice = tpn.merge(&tpn);
        assert_eq!(twice.dimensions().len(), tpn.dimensions().len());
        assert_eq!(twice.presets(), &["tpn".to_string()]);
        assert_eq!(twice.routing().len(), tpn.routing().len());
    }

    #[test]
    fn merge_left_wins_dims_right_wins_routes() {
        let shared_left = custom_dimension("SHARED", "Left label");
        let shared_right = custom_dimension("SHARED", "Right label");
        let left = SecurityProfile::new(
            vec![shared_left.clone()],
            RoutingTable::new().with(shared_left.clone(), RiskLevel::Low, "left"),
            vec!["a".into()],
        );
        let right = SecurityProfile::new(
            vec![shared_right.clone()],
            RoutingTable::new().with(shared_right, RiskLevel::Low, "right"),
            vec!["b".into(), "a".into()],
        );
        let merged = left.merge(&right);
        assert_eq!(merged.dimensions().len(), 1);
        assert_eq!(merged.dimensions()[0].label(), "Left label");
        assert_eq!(merged.routing().get(&shared_left, RiskLevel::Low), Some("right"));
        assert_eq!(merged.presets(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn display_format() {
        let p = SecurityProfile::from_preset(&tpn_preset())
            .merge(&SecurityProfile::from_preset(&vfx_preset()));
        assert_eq!(p.to_string(), "SecurityProfile(dimensions=12, presets=[\"tpn\", \"vfx\"])");
        assert_eq!(SecurityProfile::default().to_string(), "SecurityProfile(dimensions=0, presets=[])");
    }

    #[test]
    fn apply_overlays_routing_without_touching_dimensions() {
        let profile = SecurityProfile::from_preset(&tpn_preset());
        let mut ctx = UseCaseContext::new("AI Dailies");
        let before_dims = ctx.dimensions().len();
        apply_security_profile(&mut ctx, &profile);

        assert_eq!(ctx.dimensions().len(), before_dims);
        assert_eq!(ctx.routing().len(), 24 + 24);
        // shared default table is untouched
        assert_eq!(default_routing().len(), 24);

        let content = profile.dimension("TPN_CONTENT_SECURITY").unwrap().clone();
        let flag = ctx.flag_risk(content, RiskLevel::High, "Leak", None);
        assert_eq!(flag.reviewer, "VP Security / CISO");
        assert_eq!(ctx.dimensions().len(), before_dims + 1);
    }

    #[test]
    fn apply_profile_wins_on_collision() {
        let override_table = RoutingTable::new().with(
            ucc_types::Dimension::LEGAL_IP,
            RiskLevel::High,
            "Studio Counsel",
        );
        let profile = SecurityProfile::new(vec![], override_table, vec!["custom".into()]);
        let mut ctx = UseCaseContext::new("uc");
        apply_security_profile(&mut ctx, &profile);
        let flag = ctx.flag_risk(ucc_types::Dimension::LEGAL_IP, RiskLevel::High, "x", None);
        assert_eq!(flag.reviewer, "Studio Counsel");
    }

    proptest! {
        #[test]
        fn merge_never_duplicates_names(picks in prop::collection::vec(0usize..4, 0..8)) {
            let pool = [
                SecurityProfile::from_preset(&tpn_preset()),
                SecurityProfile::from_preset(&vfx_preset()),
                SecurityProfile::from_preset(&crate::catalog::enterprise_preset()),
                SecurityProfile::default(),
            ];
            let merged = picks
                .iter()
                .fold(SecurityProfile::default(), |acc, i| acc.merge(&pool[*i]));
            let mut names: Vec<_> = merged.dimensions().iter().map(|d| d.name().to_string()).collect();
            let total = names.len();
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), total);
        }
    }
}
