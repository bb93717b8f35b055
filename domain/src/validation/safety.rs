//! Safety check: scan action text against a catalog of attack patterns.
//!
//! Every string the action carries (target, payload values, and `key: value`
//! pairs for business-rule patterns) is matched case-insensitively against
//! each [`AttackFamily`]. The [`SafetyProfile`] decides per family whether a
//! match blocks execution or is only recorded.
//!
//! Business-logic abuse (negative or absurd prices and quantities) lives here
//! and only here; the goal check never looks at it.

use super::check::{ActionCheck, CheckSeverity, Verdict};
use crate::action::{Action, ActionType};
use crate::persona::Persona;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A family of attack patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackFamily {
    SqlInjection,
    ScriptInjection,
    PathTraversal,
    CommandInjection,
    BusinessLogicAbuse,
    UnsafeUpload,
}

impl AttackFamily {
    pub const ALL: [AttackFamily; 6] = [
        AttackFamily::SqlInjection,
        AttackFamily::ScriptInjection,
        AttackFamily::PathTraversal,
        AttackFamily::CommandInjection,
        AttackFamily::BusinessLogicAbuse,
        AttackFamily::UnsafeUpload,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttackFamily::SqlInjection => "sql_injection",
            AttackFamily::ScriptInjection => "script_injection",
            AttackFamily::PathTraversal => "path_traversal",
            AttackFamily::CommandInjection => "command_injection",
            AttackFamily::BusinessLogicAbuse => "business_logic_abuse",
            AttackFamily::UnsafeUpload => "unsafe_upload",
        }
    }
}

impl std::fmt::Display for AttackFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strictness of the safety check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyProfile {
    /// Every family blocks; uploads screened against the extended list
    Strict,
    /// Injection families and executable uploads block; the rest is advisory
    #[default]
    Balanced,
    /// Nothing blocks; matches are recorded as advisories
    Neutral,
}

impl SafetyProfile {
    /// Whether a match in `family` is a hard failure under this profile
    pub fn blocks(&self, family: AttackFamily) -> bool {
        match self {
            SafetyProfile::Strict => true,
            SafetyProfile::Balanced => matches!(
                family,
                AttackFamily::SqlInjection
                    | AttackFamily::ScriptInjection
                    | AttackFamily::CommandInjection
                    | AttackFamily::UnsafeUpload
            ),
            SafetyProfile::Neutral => false,
        }
    }

    /// Profile suited to a persona: adversarial testers get `Strict`
    pub fn for_persona(persona: &Persona) -> Self {
        if persona.is_adversarial() {
            SafetyProfile::Strict
        } else {
            SafetyProfile::Balanced
        }
    }

    fn upload_patterns(&self) -> &'static [Regex] {
        match self {
            SafetyProfile::Strict => &STRICT_UPLOAD_PATTERNS,
            SafetyProfile::Balanced | SafetyProfile::Neutral => &UPLOAD_PATTERNS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyProfile::Strict => "strict",
            SafetyProfile::Balanced => "balanced",
            SafetyProfile::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SafetyProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SafetyProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(SafetyProfile::Strict),
            "balanced" => Ok(SafetyProfile::Balanced),
            "neutral" => Ok(SafetyProfile::Neutral),
            other => Err(format!(
                "Unknown safety profile: {}. Valid: strict, balanced, neutral",
                other
            )),
        }
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).expect("safety catalog pattern should compile"))
        .collect()
}

static SQL_INJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"'\s*or\s+1\s*=\s*1",
        r"'\s*or\s+'1'\s*=\s*'1",
        r";\s*drop\s+table",
        r"union\s+(all\s+)?select",
        r"'\s*;",
        r"'\s*--",
        r"exec\s*\(",
        r"execute\s+immediate",
    ])
});

static SCRIPT_INJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"<script[^>]*>",
        r"javascript:",
        r"onerror\s*=",
        r"onload\s*=",
        r"<iframe",
    ])
});

static PATH_TRAVERSAL_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"\.\./", r"\.\.\\", r"%2e%2e", r"\.\.%2f"]));

static COMMAND_INJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r";\s*rm\s+-rf",
        r"\|\s*cat\s+/etc/passwd",
        r"(;|&&|\|\|)\s*(rm|cat|curl|wget|sh|bash|nc)\b",
        r"`[^`]+`",
        r"\$\([^)]*\)",
    ])
});

static BUSINESS_LOGIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"price["']?\s*[:=]\s*-"#,
        r#"price["']?\s*[:=]\s*0(\.0+)?([^0-9.]|$)"#,
        r#"price["']?\s*[:=]\s*9{5,}"#,
        r#"quantity["']?\s*[:=]\s*-"#,
        r#"quantity["']?\s*[:=]\s*0([^0-9.]|$)"#,
        r#"quantity["']?\s*[:=]\s*\d{3,}"#,
        r#"stock["']?\s*[:=]\s*-"#,
    ])
});

static UPLOAD_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"\.exe$", r"\.sh$", r"\.bat$"]));

static STRICT_UPLOAD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\.exe$", r"\.sh$", r"\.bat$", r"\.cmd$", r"\.scr$", r"malware", r"virus", r"exploit",
    ])
});

/// One catalog hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyFinding {
    pub family: AttackFamily,
    /// Which part of the action matched (`target` or `payload`)
    pub field: &'static str,
    pub pattern: String,
}

impl std::fmt::Display for SafetyFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in {} (pattern {})", self.family, self.field, self.pattern)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyCheck {
    profile: SafetyProfile,
}

impl SafetyCheck {
    pub fn new(profile: SafetyProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> SafetyProfile {
        self.profile
    }

    /// Every family match in the action, at most one per family and field
    pub fn scan(&self, action: &Action) -> Vec<SafetyFinding> {
        let mut fields: Vec<(&'static str, String)> = Vec::new();
        if !action.target.is_empty() {
            fields.push(("target", action.target.clone()));
        }
        for value in action.payload_strings() {
            fields.push(("payload", value.to_string()));
        }
        let pairs = action.payload_text();

        let mut findings = Vec::new();
        for family in AttackFamily::ALL {
            let patterns: &[Regex] = match family {
                AttackFamily::SqlInjection => &SQL_INJECTION_PATTERNS,
                AttackFamily::ScriptInjection => &SCRIPT_INJECTION_PATTERNS,
                AttackFamily::PathTraversal => &PATH_TRAVERSAL_PATTERNS,
                AttackFamily::CommandInjection => &COMMAND_INJECTION_PATTERNS,
                AttackFamily::BusinessLogicAbuse => &BUSINESS_LOGIC_PATTERNS,
                AttackFamily::UnsafeUpload => {
                    if !is_upload(action) {
                        continue;
                    }
                    self.profile.upload_patterns()
                }
            };

            let mut scanned: Vec<(&'static str, &str)> =
                fields.iter().map(|(f, t)| (*f, t.as_str())).collect();
            if family == AttackFamily::BusinessLogicAbuse && !pairs.is_empty() {
                scanned.push(("payload", pairs.as_str()));
            }

            let mut hit_fields: Vec<&'static str> = Vec::new();
            for (field, text) in scanned {
                if hit_fields.contains(&field) {
                    continue;
                }
                if let Some(pattern) = patterns.iter().find(|re| re.is_match(text)) {
                    hit_fields.push(field);
                    findings.push(SafetyFinding {
                        family,
                        field,
                        pattern: pattern.as_str().trim_start_matches("(?i)").to_string(),
                    });
                }
            }
        }
        findings
    }
}

fn is_upload(action: &Action) -> bool {
    action.action_type == ActionType::Upload
        || (action.action_type == ActionType::Type && action.target.to_lowercase().contains("upload"))
}

impl ActionCheck for SafetyCheck {
    fn name(&self) -> &'static str {
        "safety"
    }

    fn severity(&self) -> CheckSeverity {
        CheckSeverity::Hard
    }

    fn evaluate(&self, action: &Action, _persona: &Persona) -> Verdict {
        let findings = self.scan(action);
        if let Some(blocking) = findings.iter().find(|f| self.profile.blocks(f.family)) {
            return Verdict::Fail(format!(
                "{} blocked under {} profile",
                blocking, self.profile
            ));
        }
        if findings.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Advisory(
                findings
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        }
    }
}
