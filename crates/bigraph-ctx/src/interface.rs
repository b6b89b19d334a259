//! Interfaces between contextual bigraphs.
//!
//! An interface couples the ports of two fragments by name, like a module
//! system, instead of relying on site order and link names matching exactly.
//! Directions follow composition:
//!
//! - `sites`: outer fragment's inner site → inner fragment's outer site,
//! - `links`: inner fragment's outer link → outer fragment's inner link.
//!
//! Names are not checked against any fragment here; `compose` resolves them.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as Json;

use crate::{CtxError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BigraphInterface {
    sites: BTreeMap<String, String>,
    links: BTreeMap<String, String>,
}

impl BigraphInterface {
    pub fn new<S, L, K1, V1, K2, V2>(sites: S, links: L) -> Self
    where
        S: IntoIterator<Item = (K1, V1)>,
        L: IntoIterator<Item = (K2, V2)>,
        K1: Into<String>,
        V1: Into<String>,
        K2: Into<String>,
        V2: Into<String>,
    {
        Self {
            sites: sites
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            links: links
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse `{"sites": {..}, "links": {..}}`.
    ///
    /// Either section may be omitted; every entry must map a string to a
    /// string.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Json = serde_json::from_str(text).map_err(|e| CtxError::MalformedInterface {
            detail: e.to_string(),
        })?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Json) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| CtxError::MalformedInterface {
            detail: "expected a JSON object with `sites` and `links`".to_string(),
        })?;
        if let Some(key) = obj.keys().find(|k| *k != "sites" && *k != "links") {
            return Err(CtxError::MalformedInterface {
                detail: format!("unexpected section `{key}`"),
            });
        }
        Ok(Self {
            sites: string_pairs(obj.get("sites"), "sites")?,
            links: string_pairs(obj.get("links"), "links")?,
        })
    }

    pub fn sites(&self) -> &BTreeMap<String, String> {
        &self.sites
    }

    pub fn links(&self) -> &BTreeMap<String, String> {
        &self.links
    }

    pub fn to_json(&self) -> Json {
        serde_json::json!({ "sites": self.sites, "links": self.links })
    }
}

fn string_pairs(section: Option<&Json>, name: &str) -> Result<BTreeMap<String, String>> {
    let Some(section) = section else {
        return Ok(BTreeMap::new());
    };
    let obj = section
        .as_object()
        .ok_or_else(|| CtxError::MalformedInterface {
            detail: format!("`{name}` must be an object of name pairs"),
        })?;
    obj.iter()
        .map(|(k, v)| match v.as_str() {
            Some(s) => Ok((k.clone(), s.to_string())),
            None => Err(CtxError::MalformedInterface {
                detail: format!("`{name}` entry `{k}` maps to {v}, expected a port name"),
            }),
        })
        .collect()
}
