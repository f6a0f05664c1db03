use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

/// Keyword configuration handed to a page constructor.
///
/// `base_url` and `timeout` are understood by every page; page-specific
/// options go in `extra` as JSON scalars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageKwargs {
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub extra: BTreeMap<String, Value>,
}

impl PageKwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.base_url.is_none() && self.timeout.is_none() && self.extra.is_empty()
    }

    /// Copy of `self` with every key set in `overlay` replaced.
    pub fn merged(&self, overlay: &PageKwargs) -> PageKwargs {
        let mut out = self.clone();
        if let Some(url) = &overlay.base_url {
            out.base_url = Some(url.clone());
        }
        if let Some(timeout) = overlay.timeout {
            out.timeout = Some(timeout);
        }
        for (key, value) in &overlay.extra {
            out.extra.insert(key.clone(), value.clone());
        }
        out
    }

    /// Parse a `KEY=VALUE` pair. `base_url` and `timeout` (seconds) land in
    /// their own fields; other values are parsed as JSON when possible and
    /// kept as strings otherwise.
    pub fn parse_pair(mut self, pair: &str) -> Result<Self, String> {
        let (key, raw) = split_pair(pair)?;
        match key {
            "base_url" => self.base_url = Some(raw.to_string()),
            "timeout" => {
                let secs: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| format!("timeout must be a number of seconds, got '{}'", raw))?;
                if secs < 0.0 {
                    return Err(format!("timeout must be non-negative, got '{}'", raw));
                }
                let timeout = Duration::try_from_secs_f64(secs)
                    .map_err(|_| format!("timeout out of range, got '{}'", raw))?;
                self.timeout = Some(timeout);
            }
            _ => {
                self.extra.insert(key.to_string(), parse_scalar(raw));
            }
        }
        Ok(self)
    }
}

/// Split `KEY=VALUE` at the first `=`, trimming the key. An empty key is an
/// error.
pub fn split_pair(pair: &str) -> Result<(&str, &str), String> {
    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", pair))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", pair));
    }
    Ok((key, raw))
}

/// `raw` as a JSON scalar (number, boolean, null or quoted string), else
/// the raw text as a string.
pub fn parse_scalar(raw: &str) -> Value {
    serde_json::from_str::<Value>(raw)
        .ok()
        .filter(|v| !v.is_object() && !v.is_array())
        .unwrap_or_else(|| Value::String(raw.to_string()))
}
