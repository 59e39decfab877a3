//! Record and JSON codec for [`UseCaseContext`].
//!
//! Built-in dimensions are written by name only. Custom dimensions also
//! carry `dimension_label`, and its presence is what tells the decoder to
//! rebuild a custom dimension instead of resolving a built-in.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ucc_types::{
    format_timestamp, parse_timestamp, time, BuiltinDimension, Dimension, ReviewStatus, RiskFlag,
    RiskLevel, RoutingTable,
};

use crate::context::UseCaseContext;
use crate::error::{CodecError, Result};

/// Persisted shape of a use case.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UseCaseRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub workflow_phase: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub risk_flags: Vec<FlagRecord>,
}

/// Persisted shape of a risk flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlagRecord {
    pub dimension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_label: Option<String>,
    pub level: String,
    pub description: String,
    #[serde(default)]
    pub reviewer: String,
    pub status: String,
    #[serde(default)]
    pub resolution_notes: String,
    /// Required key; `null` decodes as "now".
    #[serde(deserialize_with = "Option::deserialize")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
}

impl FlagRecord {
    pub fn from_flag(flag: &RiskFlag) -> Self {
        let dimension_label = match &flag.dimension {
            Dimension::Custom { label, .. } => Some(label.clone()),
            Dimension::Builtin(_) => None,
        };
        Self {
            dimension: flag.dimension.name().to_string(),
            dimension_label,
            level: flag.level.name().to_string(),
            description: flag.description.clone(),
            reviewer: flag.reviewer.clone(),
            status: flag.status.name().to_string(),
            resolution_notes: flag.resolution_notes.clone(),
            created_at: Some(format_timestamp(&flag.created_at)),
            resolved_at: flag.resolved_at.as_ref().map(format_timestamp),
        }
    }

    pub fn into_flag(self) -> Result<RiskFlag> {
        let dimension = match self.dimension_label {
            Some(label) => Dimension::custom(self.dimension, label),
            None => Dimension::Builtin(self.dimension.parse::<BuiltinDimension>()?),
        };
        let level: RiskLevel = self.level.parse()?;
        let status: ReviewStatus = self.status.parse()?;

        Ok(RiskFlag {
            dimension,
            level,
            description: self.description,
            reviewer: self.reviewer,
            status,
            resolution_notes: self.resolution_notes,
            created_at: decode_timestamp(self.created_at.as_deref())?.unwrap_or_else(time::now),
            resolved_at: decode_timestamp(self.resolved_at.as_deref())?,
        })
    }
}

fn decode_timestamp(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            parse_timestamp(s).map_err(|source| CodecError::Timestamp {
                value: s.to_string(),
                source,
            })
        })
        .transpose()
}

impl UseCaseRecord {
    pub fn from_context(ctx: &UseCaseContext) -> Self {
        Self {
            name: ctx.name.clone(),
            description: ctx.description.clone(),
            workflow_phase: ctx.workflow_phase.clone(),
            tags: ctx.tags.clone(),
            created_at: Some(format_timestamp(&ctx.created_at)),
            risk_flags: ctx.flags().iter().map(FlagRecord::from_flag).collect(),
        }
    }

    /// Rebuild a context. With no routing table the default is used.
    pub fn into_context(self, routing: Option<Arc<RoutingTable>>) -> Result<UseCaseContext> {
        let created_at = decode_timestamp(self.created_at.as_deref())?.unwrap_or_else(time::now);
        let mut ctx = UseCaseContext::new(self.name)
            .with_description(self.description)
            .with_phase(self.workflow_phase)
            .with_tags(self.tags)
            .with_created_at(created_at);
        if let Some(routing) = routing {
            ctx.set_routing(routing);
        }
        for record in self.risk_flags {
            ctx.push_flag(record.into_flag()?);
        }
        debug!(use_case = %ctx.name, flags = ctx.flags().len(), "Decoded use case");
        Ok(ctx)
    }
}

/// Serialize a context to a [`serde_json::Value`].
pub fn to_value(ctx: &UseCaseContext) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(UseCaseRecord::from_context(ctx))?)
}

pub fn from_value(
    value: serde_json::Value,
    routing: Option<Arc<RoutingTable>>,
) -> Result<UseCaseContext> {
    let record: UseCaseRecord = serde_json::from_value(value)?;
    record.into_context(routing)
}

/// Serialize a context to pretty JSON.
pub fn to_json(ctx: &UseCaseContext) -> Result<String> {
    Ok(serde_json::to_string_pretty(&UseCaseRecord::from_context(ctx))?)
}

pub fn from_json(json: &str, routing: Option<Arc<RoutingTable>>) -> Result<UseCaseContext> {
    let record: UseCaseRecord = serde_json::from_str(json)?;
    record.into_context(routing)
}

impl UseCaseContext {
    pub fn to_record(&self) -> UseCaseRecord {
        UseCaseRecord::from_context(self)
    }

    pub fn to_json(&self) -> Result<String> {
        to_json(self)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        from_json(json, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_types::{custom_dimension, TypesError};

    fn sample() -> UseCaseContext {
        let mut ctx = UseCaseContext::new("Digital Double")
            .with_description("Face replacement for stunt sequences")
            .with_phase("Pre-Production")
            .with_tags(["vfx", "likeness"]);
        ctx.flag_risk(Dimension::LEGAL_IP, RiskLevel::High, "Likeness consent", None);
        ctx.flag_risk(Dimension::QUALITY, RiskLevel::Medium, "Uncanny valley", None)
            .begin_review();
        ctx.flag_risk(
            custom_dimension("FINANCIAL", "Financial Risk"),
            RiskLevel::Low,
            "Render budget",
            Some("CFO"),
        )
        .resolve("Budget approved");
        ctx
    }

    #[test]
    fn round_trip_preserves_contract() {
        let ctx = sample();
        let json = ctx.to_json().unwrap();
        let back = UseCaseContext::from_json(&json).unwrap();

        assert_eq!(back.name, ctx.name);
        assert_eq!(back.description, ctx.description);
        assert_eq!(back.workflow_phase, ctx.workflow_phase);
        assert_eq!(back.tags, ctx.tags);
        assert_eq!(back.created_at, ctx.created_at);
        assert_eq!(back.is_blocked(), ctx.is_blocked());
        assert_eq!(back.flags(), ctx.flags());
    }

    #[test]
    fn label_only_for_custom_dimensions() {
        let value = to_value(&sample()).unwrap();
        let flags = value["risk_flags"].as_array().unwrap();
        assert!(flags[0].get("dimension_label").is_none());
        assert_eq!(flags[0]["dimension"], "LEGAL_IP");
        assert_eq!(flags[1]["status"], "IN_REVIEW");
        assert_eq!(flags[2]["dimension_label"], "Financial Risk");
        assert!(flags[0]["resolved_at"].is_null());
        assert!(flags[2]["resolved_at"].is_string());
    }

    #[test]
    fn custom_dimension_survives() {
        let back = from_value(to_value(&sample()).unwrap(), None).unwrap();
        let flag = back.flag(2).unwrap();
        assert!(flag.dimension.is_custom());
        assert_eq!(flag.dimension.label(), "Financial Risk");
        assert!(back.risk_score().contains_key("Financial Risk"));
    }

    #[test]
    fn missing_name_is_error() {
        let err = from_json(r#"{"description": "x"}"#, None).unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn unknown_builtin_without_label_is_error() {
        let json = r#"{
            "name": "x",
            "risk_flags": [{
                "dimension": "FINANCIAL", "level": "LOW", "description": "d",
                "status": "OPEN", "created_at": "2024-01-01T00:00:00.000000"
            }]
        }"#;
        let err = from_json(json, None).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Identifier(TypesError::UnknownDimension(_))
        ));
    }

    #[test]
    fn flag_without_created_at_key_is_error() {
        let json = r#"{"name": "x", "risk_flags": [
            {"dimension": "SAFETY", "level": "LOW", "description": "d", "status": "OPEN"}
        ]}"#;
        assert!(matches!(from_json(json, None), Err(CodecError::Json(_))));
    }

    #[test]
    fn flag_with_null_created_at_decodes_as_now() {
        let before = time::now();
        let json = r#"{"name": "x", "risk_flags": [
            {"dimension": "SAFETY", "level": "LOW", "description": "d", "status": "OPEN",
             "created_at": null}
        ]}"#;
        let ctx = from_json(json, None).unwrap();
        assert_eq!(ctx.flags().len(), 1);
        assert!(ctx.flags()[0].created_at >= before);
    }

    #[test]
    fn bad_timestamp_is_error() {
        let json = r#"{"name": "x", "created_at": "last tuesday"}"#;
        assert!(matches!(
            from_json(json, None),
            Err(CodecError::Timestamp { .. })
        ));
    }

    #[test]
    fn optional_fields_default() {
        let ctx = from_json(r#"{"name": "bare"}"#, None).unwrap();
        assert_eq!(ctx.name, "bare");
        assert!(ctx.tags.is_empty());
        assert!(ctx.flags().is_empty());
    }

    #[test]
    fn supplied_routing_is_used() {
        let table = Arc::new(RoutingTable::new().with(Dimension::SAFETY, RiskLevel::Low, "X"));
        let mut ctx = from_json(r#"{"name": "routed"}"#, Some(Arc::clone(&table))).unwrap();
        let flag = ctx.flag_risk(Dimension::SAFETY, RiskLevel::Low, "d", None);
        assert_eq!(flag.reviewer, "X");
    }
}
