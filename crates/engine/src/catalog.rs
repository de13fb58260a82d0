//! Template catalog: per-language bundles, fallback-key resolution and
//! parameter substitution.
//!
//! Bundles are flat `key → template` maps, one per language plus the default.
//! Body resolution tries `{kind}.body.self` (self events), then
//! `{kind}.body.actor`, then the mandatory generic `{kind}.body`. Unknown
//! languages fall back to the default bundle; unmatched `{placeholder}`s are
//! left intact so a template typo never fails a delivery.

use std::collections::{BTreeMap, HashMap};

use herald_common::error::HeraldError;
use herald_common::types::{LocalizedMessage, NotificationContext, NotificationKind};

use crate::params::derive_params;

const BUILTIN_BUNDLES: &[(&str, &str)] = &[
    ("en", include_str!("../i18n/en.json")),
    ("es", include_str!("../i18n/es.json")),
    ("de", include_str!("../i18n/de.json")),
];

#[derive(Debug)]
pub struct TemplateCatalog {
    /// Non-default bundles, keyed by language code.
    bundles: HashMap<String, HashMap<String, String>>,
    default_bundle: HashMap<String, String>,
    default_language: String,
}

impl TemplateCatalog {
    /// Build the catalog from the embedded bundles.
    pub fn builtin(default_language: &str) -> Result<Self, HeraldError> {
        let mut bundles = HashMap::new();
        for (language, raw) in BUILTIN_BUNDLES {
            let bundle: HashMap<String, String> = serde_json::from_str(raw).map_err(|e| {
                HeraldError::Template(format!("Invalid template bundle '{}': {}", language, e))
            })?;
            bundles.insert(language.to_string(), bundle);
        }
        Self::from_bundles(bundles, default_language)
    }

    /// Build a catalog from caller-supplied bundles.
    ///
    /// Validation is done once, here: the default bundle must exist, and every
    /// bundle must carry the generic `{kind}.title` and `{kind}.body` keys for
    /// every kind. A gap is a fatal configuration error, not something to
    /// discover mid-dispatch.
    pub fn from_bundles(
        mut bundles: HashMap<String, HashMap<String, String>>,
        default_language: &str,
    ) -> Result<Self, HeraldError> {
        for (language, bundle) in &bundles {
            for kind in NotificationKind::ALL {
                for suffix in ["title", "body"] {
                    let key = format!("{}.{}", kind, suffix);
                    if !bundle.contains_key(&key) {
                        return Err(HeraldError::Template(format!(
                            "Bundle '{}' is missing required key '{}'",
                            language, key
                        )));
                    }
                }
            }
        }

        let default_bundle = bundles.remove(default_language).ok_or_else(|| {
            HeraldError::Template(format!(
                "No bundle for default language '{}'",
                default_language
            ))
        })?;

        tracing::info!(
            languages = bundles.len() + 1,
            default_language,
            "Template catalog loaded"
        );

        Ok(Self {
            bundles,
            default_bundle,
            default_language: default_language.to_string(),
        })
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Resolve and render the message for a device's language and self/actor
    /// status.
    pub fn localize(
        &self,
        kind: NotificationKind,
        context: &NotificationContext,
        language: &str,
        is_self: bool,
    ) -> LocalizedMessage {
        let bundle = self.bundle(language);
        let params = derive_params(kind, context);

        let title = bundle
            .get(&format!("{}.title", kind))
            .map(String::as_str)
            .unwrap_or_default();
        let body = self
            .resolve_body(bundle, kind, is_self)
            .unwrap_or_default();

        LocalizedMessage {
            title: substitute(title, &params),
            body: substitute(body, &params),
        }
    }

    /// Render using only the generic body key, skipping the self/actor
    /// variants. Used for the persisted in-app record.
    pub fn localize_generic(
        &self,
        kind: NotificationKind,
        context: &NotificationContext,
        language: &str,
    ) -> LocalizedMessage {
        let bundle = self.bundle(language);
        let params = derive_params(kind, context);

        let title = bundle
            .get(&format!("{}.title", kind))
            .map(String::as_str)
            .unwrap_or_default();
        let body = bundle
            .get(&format!("{}.body", kind))
            .map(String::as_str)
            .unwrap_or_default();

        LocalizedMessage {
            title: substitute(title, &params),
            body: substitute(body, &params),
        }
    }

    /// Body key resolution: self variant → actor variant → generic.
    fn resolve_body<'a>(
        &self,
        bundle: &'a HashMap<String, String>,
        kind: NotificationKind,
        is_self: bool,
    ) -> Option<&'a str> {
        if is_self
            && let Some(body) = bundle.get(&format!("{}.body.self", kind))
        {
            return Some(body);
        }
        if !is_self
            && let Some(body) = bundle.get(&format!("{}.body.actor", kind))
        {
            return Some(body);
        }
        bundle.get(&format!("{}.body", kind)).map(String::as_str)
    }

    /// Exact language match, else the default bundle.
    fn bundle(&self, language: &str) -> &HashMap<String, String> {
        if language == self.default_language {
            return &self.default_bundle;
        }
        self.bundles.get(language).unwrap_or(&self.default_bundle)
    }
}

/// Replace every `{name}` placeholder with its parameter value. Placeholders
/// without a parameter are left untouched.
fn substitute(template: &str, params: &BTreeMap<String, String>) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        let placeholder = format!("{{{}}}", name);
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, value);
        }
    }
    out
}
