//! Responsibility resolution
//!
//! Maps an analysis to the roles that must act on it (RACI "R") and to the
//! approval flow that governs the resulting escalation.

use super::definitions::{
    ApprovalFlowCatalog, ApprovalFlowTemplate, DEFAULT_DECISION_TYPE, DecisionType,
    DefinitionSource, RaciMatrix,
};
use crate::analysis::{AnalysisResult, PatternKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Role used when no RACI entry names a responsible role
pub const FALLBACK_ROLE: &str = "Executive";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responsibility {
    pub target_roles: Vec<String>,
    pub approval_flow_id: Option<String>,
}

impl Default for Responsibility {
    fn default() -> Self {
        Self {
            target_roles: vec![FALLBACK_ROLE.to_string()],
            approval_flow_id: None,
        }
    }
}

pub struct ResponsibilityResolver {
    definitions: Arc<dyn DefinitionSource>,
}

impl ResponsibilityResolver {
    pub fn new(definitions: Arc<dyn DefinitionSource>) -> Self {
        Self { definitions }
    }

    /// An analysis without findings resolves as the `default` decision type.
    pub fn resolve(&self, analysis: &AnalysisResult) -> Responsibility {
        let default_kind = PatternKind::from_id(DEFAULT_DECISION_TYPE);
        let pattern = analysis.primary_pattern().unwrap_or(&default_kind);

        let target_roles = self
            .definitions
            .raci()
            .as_ref()
            .and_then(|raci| decision_for(raci, pattern))
            .map(|decision| decision.responsible.clone())
            .filter(|roles| !roles.is_empty())
            .unwrap_or_else(|| vec![FALLBACK_ROLE.to_string()]);

        let approval_flow_id = self
            .definitions
            .approval_flows()
            .as_ref()
            .and_then(|catalog| template_for(catalog, pattern))
            .map(|template| template.flow_id.clone());

        debug!(
            pattern = pattern.id(),
            roles = ?target_roles,
            flow = ?approval_flow_id,
            "Resolved responsibility"
        );

        Responsibility {
            target_roles,
            approval_flow_id,
        }
    }
}

fn decision_for<'a>(raci: &'a RaciMatrix, pattern: &PatternKind) -> Option<&'a DecisionType> {
    raci.decision_types
        .iter()
        .find(|d| pattern.matches_id(&d.decision_type_id))
        .or_else(|| {
            raci.decision_types
                .iter()
                .find(|d| d.decision_type_id == DEFAULT_DECISION_TYPE)
        })
}

/// Template listing the pattern, else one listing `default`, else the first.
fn template_for<'a>(
    catalog: &'a ApprovalFlowCatalog,
    pattern: &PatternKind,
) -> Option<&'a ApprovalFlowTemplate> {
    let listing = |want: &dyn Fn(&str) -> bool| {
        catalog
            .templates
            .iter()
            .find(|t| t.decision_type_ids.iter().any(|id| want(id)))
    };
    listing(&|id| pattern.matches_id(id))
        .or_else(|| listing(&|id| id == DEFAULT_DECISION_TYPE))
        .or_else(|| catalog.templates.first())
}
