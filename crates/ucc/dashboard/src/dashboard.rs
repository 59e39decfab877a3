use std::collections::{BTreeMap, HashSet};
use std::fmt;

use tracing::{info, warn};
use ucc_context::UseCaseContext;
use ucc_types::{Dimension, RiskFlag, RiskLevel};

/// Phase label for use cases with no workflow phase.
pub const UNASSIGNED_PHASE: &str = "(unassigned)";

/// Aggregated stats for one dimension across every registered use case.
#[derive(Clone, Debug, PartialEq)]
pub struct DimensionSummary {
    pub dimension: Dimension,
    pub total_flags: usize,
    /// Flags neither resolved nor accepted.
    pub open_flags: usize,
    pub blocking_flags: usize,
    /// Highest level ever flagged; settling flags does not lower it.
    pub max_level: RiskLevel,
    pub affected_use_cases: Vec<String>,
}

impl DimensionSummary {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            total_flags: 0,
            open_flags: 0,
            blocking_flags: 0,
            max_level: RiskLevel::None,
            affected_use_cases: Vec::new(),
        }
    }
}

/// Registry of use cases keyed by name, in registration order.
#[derive(Debug, Default)]
pub struct GovernanceDashboard {
    use_cases: Vec<UseCaseContext>,
}

impl GovernanceDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Registration ------------------------------------------------------

    /// Register a use case. An existing entry with the same name is replaced
    /// in place.
    pub fn register(&mut self, use_case: UseCaseContext) {
        match self.position(&use_case.name) {
            Some(index) => {
                warn!(use_case = %use_case.name, "Replacing registered use case");
                self.use_cases[index] = use_case;
            }
            None => {
                info!(use_case = %use_case.name, "Use case registered");
                self.use_cases.push(use_case);
            }
        }
    }

    /// Remove a use case by name, returning it if it was registered.
    pub fn unregister(&mut self, name: &str) -> Option<UseCaseContext> {
        let index = self.position(name)?;
        info!(use_case = %name, "Use case unregistered");
        Some(self.use_cases.remove(index))
    }

    pub fn use_cases(&self) -> &[UseCaseContext] {
        &self.use_cases
    }

    pub fn use_cases_mut(&mut self) -> impl Iterator<Item = &mut UseCaseContext> {
        self.use_cases.iter_mut()
    }

    pub fn get(&self, name: &str) -> Option<&UseCaseContext> {
        self.use_cases.iter().find(|uc| uc.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut UseCaseContext> {
        self.use_cases.iter_mut().find(|uc| uc.name == name)
    }

    pub fn len(&self) -> usize {
        self.use_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.use_cases.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.use_cases.iter().position(|uc| uc.name == name)
    }

    // -- Aggregated queries ------------------------------------------------

    /// Every flag as `(use case name, flag)`, registration order first.
    pub fn all_flags(&self) -> Vec<(&str, &RiskFlag)> {
        self.use_cases
            .iter()
            .flat_map(|uc| uc.flags().iter().map(move |f| (uc.name.as_str(), f)))
            .collect()
    }

    pub fn blocked_use_cases(&self) -> Vec<&UseCaseContext> {
        self.use_cases.iter().filter(|uc| uc.is_blocked()).collect()
    }

    pub fn clear_use_cases(&self) -> Vec<&UseCaseContext> {
        self.use_cases.iter().filter(|uc| !uc.is_blocked()).collect()
    }

    /// `risk_score()` of every use case, keyed by use case name.
    pub fn portfolio_risk_scores(&self) -> BTreeMap<String, BTreeMap<String, u8>> {
        self.use_cases
            .iter()
            .map(|uc| (uc.name.clone(), uc.risk_score()))
            .collect()
    }

    // -- Per-dimension aggregation -----------------------------------------

    /// All dimensions across use cases plus the built-ins, deduplicated by name.
    pub fn all_dimensions(&self) -> Vec<Dimension> {
        let mut seen = HashSet::new();
        let mut dims = Vec::new();
        let from_use_cases = self.use_cases.iter().flat_map(|uc| uc.dimensions());
        for dim in from_use_cases.chain(Dimension::builtins()) {
            if seen.insert(dim.name().to_string()) {
                dims.push(dim);
            }
        }
        dims
    }

    pub fn dimension_summary(&self, dimension: &Dimension) -> DimensionSummary {
        let mut summary = DimensionSummary::new(dimension.clone());
        for uc in &self.use_cases {
            let flags = uc.get_flags_by_dimension(dimension);
            if flags.is_empty() {
                continue;
            }
            summary.affected_use_cases.push(uc.name.clone());
            for flag in flags {
                summary.total_flags += 1;
                if !flag.is_settled() {
                    summary.open_flags += 1;
                }
                if flag.is_blocking() {
                    summary.blocking_flags += 1;
                }
                summary.max_level = summary.max_level.max(flag.level);
            }
        }
        summary
    }

    /// Summaries for every dimension in [`all_dimensions`](Self::all_dimensions) order.
    pub fn all_dimension_summaries(&self) -> Vec<DimensionSummary> {
        self.all_dimensions()
            .iter()
            .map(|dim| self.dimension_summary(dim))
            .collect()
    }

    // -- Reviewer workload -------------------------------------------------

    /// Flags still needing action, grouped by reviewer.
    pub fn reviewer_workload(&self) -> BTreeMap<String, Vec<(&str, &RiskFlag)>> {
        let mut workload: BTreeMap<String, Vec<(&str, &RiskFlag)>> = BTreeMap::new();
        for (name, flag) in self.all_flags() {
            if flag.needs_review() || flag.is_blocking() {
                workload
                    .entry(flag.reviewer.clone())
                    .or_default()
                    .push((name, flag));
            }
        }
        workload
    }

    // -- Workflow phase view -----------------------------------------------

    pub fn by_workflow_phase(&self) -> BTreeMap<String, Vec<&UseCaseContext>> {
        let mut phases: BTreeMap<String, Vec<&UseCaseContext>> = BTreeMap::new();
        for uc in &self.use_cases {
            let phase = if uc.workflow_phase.is_empty() {
                UNASSIGNED_PHASE
            } else {
                uc.workflow_phase.as_str()
            };
            phases.entry(phase.to_string()).or_default().push(uc);
        }
        phases
    }

    // -- Summary -----------------------------------------------------------

    /// Human-readable portfolio summary.
    pub fn summary(&self) -> String {
        let total = self.use_cases.len();
        let blocked = self.blocked_use_cases();
        let all_flags = self.all_flags();
        let blocking = all_flags.iter().filter(|(_, f)| f.is_blocking()).count();
        let pending = all_flags.iter().filter(|(_, f)| f.needs_review()).count();

        let mut lines = vec![
            format!("Governance Dashboard: {} use case(s)", total),
            format!(
                "  Blocked: {}  |  Clear: {}",
                blocked.len(),
                total - blocked.len()
            ),
            format!(
                "  Total flags: {}  |  Blocking: {}  |  Pending review: {}",
                all_flags.len(),
                blocking,
                pending
            ),
            String::new(),
        ];

        if !blocked.is_empty() {
            lines.push("Blocked use cases:".to_string());
            for uc in &blocked {
                lines.push(format!(
                    "  🚫 {} ({} blocker(s))",
                    uc.name,
                    uc.get_blockers().len()
                ));
            }
            lines.push(String::new());
        }

        lines.push("Dimension overview:".to_string());
        for ds in self.all_dimension_summaries() {
            lines.push(format!(
                "  {} {}: {} open / {} total",
                ds.max_level.icon(),
                ds.dimension.label(),
                ds.open_flags,
                ds.total_flags
            ));
        }

        let workload = self.reviewer_workload();
        if !workload.is_empty() {
            lines.push(String::new());
            lines.push("Reviewer workload:".to_string());
            let mut loads: Vec<_> = workload.iter().collect();
            loads.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
            for (reviewer, items) in loads {
                lines.push(format!("  {}: {} item(s)", reviewer, items.len()));
            }
        }

        lines.join("\n")
    }
}

impl fmt::Display for GovernanceDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
