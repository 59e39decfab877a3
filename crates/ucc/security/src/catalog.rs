//! Built-in security preset packs.
//!
//! Each pack lists its dimensions with reviewers for LOW, MEDIUM, HIGH and
//! CRITICAL, in that order.

use ucc_types::{Dimension, RoutingTable};

/// One row of a pack: dimension name, label, reviewers LOW..CRITICAL.
type PackRow = (&'static str, &'static str, [&'static str; 4]);

/// A named bundle of dimensions and their routing.
#[derive(Clone, Debug, PartialEq)]
pub struct SecurityPreset {
    pub name: String,
    pub dimensions: Vec<Dimension>,
    pub routing: RoutingTable,
}

impl SecurityPreset {
    pub fn new(name: impl Into<String>, dimensions: Vec<Dimension>, routing: RoutingTable) -> Self {
        Self {
            name: name.into(),
            dimensions,
            routing,
        }
    }

    fn from_rows(name: &str, rows: &[PackRow]) -> Self {
        let mut dimensions = Vec::with_capacity(rows.len());
        let mut routing = RoutingTable::new();
        for (dim_name, label, reviewers) in rows {
            let dimension = Dimension::custom(*dim_name, *label);
            routing.insert_row(dimension.clone(), *reviewers);
            dimensions.push(dimension);
        }
        Self::new(name, dimensions, routing)
    }
}

const TPN: &[PackRow] = &[
    (
        "TPN_CONTENT_SECURITY",
        "Content Security (TPN)",
        [
            "Security Coordinator",
            "Content Security Manager",
            "VP Security / CISO",
            "CISO + Studio Security Liaison",
        ],
    ),
    (
        "TPN_PHYSICAL_SECURITY",
        "Physical Security (TPN)",
        [
            "Facility Manager",
            "Physical Security Lead",
            "VP Facilities / CISO",
            "CISO + External Security Audit",
        ],
    ),
    (
        "TPN_DIGITAL_SECURITY",
        "Digital Security (TPN)",
        [
            "IT Security Analyst",
            "IT Security Manager",
            "CISO / VP Engineering",
            "CISO + External Penetration Review",
        ],
    ),
    (
        "TPN_ASSET_MANAGEMENT",
        "Asset Management (TPN)",
        [
            "Asset Coordinator",
            "Asset Management Lead",
            "VP Production Technology",
            "CTO + Studio Asset Security",
        ],
    ),
    (
        "TPN_INCIDENT_RESPONSE",
        "Incident Response (TPN)",
        [
            "SOC Analyst",
            "Incident Response Lead",
            "CISO / VP Security",
            "CISO + Legal + Crisis Management",
        ],
    ),
    (
        "TPN_PERSONNEL_SECURITY",
        "Personnel Security (TPN)",
        [
            "HR Security Coordinator",
            "HR Director + Security Lead",
            "VP HR + CISO",
            "C-Suite + External Investigation",
        ],
    ),
];

const VFX: &[PackRow] = &[
    (
        "VFX_SECURE_TRANSFER",
        "Secure Transfer / Delivery",
        [
            "Pipeline TD",
            "Pipeline Supervisor",
            "Head of Technology / CISO",
            "CTO + Studio Delivery Security",
        ],
    ),
    (
        "VFX_RENDER_ISOLATION",
        "Render Farm Isolation",
        [
            "Render Wrangler",
            "Systems Administrator",
            "VP Technology / CISO",
            "CTO + External Infrastructure Audit",
        ],
    ),
    (
        "VFX_WORKSTATION_SECURITY",
        "Workstation Security",
        [
            "IT Support Lead",
            "IT Security Manager",
            "CISO / VP Technology",
            "CISO + Endpoint Security Review",
        ],
    ),
    (
        "VFX_CLOUD_SECURITY",
        "Cloud / Hybrid Security",
        [
            "Cloud Operations Engineer",
            "Cloud Security Architect",
            "VP Cloud Infrastructure / CISO",
            "CTO + External Cloud Audit",
        ],
    ),
    (
        "VFX_DATA_CLASSIFICATION",
        "Data Classification & Handling",
        [
            "Data Steward",
            "Data Governance Lead",
            "CISO / VP Data Governance",
            "CISO + Legal + Studio Compliance",
        ],
    ),
    (
        "VFX_VENDOR_SECURITY",
        "Third-Party Vendor Security",
        [
            "Vendor Manager",
            "Procurement Security Lead",
            "VP Procurement + CISO",
            "C-Suite + External Vendor Audit",
        ],
    ),
];

const ENTERPRISE: &[PackRow] = &[
    (
        "ENTERPRISE_ACCESS_CONTROL",
        "Access Control (IAM)",
        [
            "IAM Administrator",
            "IAM Security Lead",
            "CISO / VP Security",
            "CISO + External Identity Audit",
        ],
    ),
    (
        "ENTERPRISE_AUDIT_TRAIL",
        "Audit Trail / Logging",
        [
            "Compliance Analyst",
            "Compliance Manager",
            "VP Compliance / CISO",
            "CISO + External Auditor",
        ],
    ),
    (
        "ENTERPRISE_DATA_PRIVACY",
        "Data Privacy (GDPR/CCPA)",
        [
            "Privacy Analyst",
            "Data Protection Officer",
            "DPO + Legal Counsel",
            "DPO + General Counsel + C-Suite",
        ],
    ),
    (
        "ENTERPRISE_COMPLIANCE",
        "Regulatory Compliance",
        [
            "Compliance Analyst",
            "Compliance Officer",
            "VP Compliance + Legal",
            "General Counsel + Board Audit Committee",
        ],
    ),
    (
        "ENTERPRISE_BUSINESS_CONTINUITY",
        "Business Continuity / DR",
        [
            "BC Coordinator",
            "BC Manager",
            "VP Operations / CTO",
            "C-Suite + External DR Review",
        ],
    ),
];

/// Trusted Partner Network (MPA content security) pack.
///
/// Covers content, physical and digital security plus asset handling,
/// incident response and personnel vetting.
pub fn tpn_preset() -> SecurityPreset {
    SecurityPreset::from_rows("tpn", TPN)
}

/// VFX pipeline and facility security pack.
pub fn vfx_preset() -> SecurityPreset {
    SecurityPreset::from_rows("vfx", VFX)
}

/// Enterprise InfoSec pack (ISO 27001 / SOC 2 / NIST aligned controls).
pub fn enterprise_preset() -> SecurityPreset {
    SecurityPreset::from_rows("enterprise", ENTERPRISE)
}

/// All built-in presets in registration order.
pub fn builtin_presets() -> Vec<SecurityPreset> {
    vec![tpn_preset(), vfx_preset(), enterprise_preset()]
}
