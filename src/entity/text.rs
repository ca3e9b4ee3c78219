use std::collections::{BTreeMap, BTreeSet};

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Text keyed by locale code, stored as a JSON column.
#[derive(
  Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
#[serde(transparent)]
pub struct Localized(pub BTreeMap<String, String>);

impl Localized {
  pub fn get(&self, locale: &str) -> Option<&str> {
    self.0.get(locale).map(String::as_str)
  }

  /// Locales from `required` that have no text or only whitespace.
  pub fn missing<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
    required
      .iter()
      .filter(|locale| self.get(locale).is_none_or(|text| text.trim().is_empty()))
      .map(String::as_str)
      .collect()
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Localized {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

/// Plan capability tags.
#[derive(
  Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
#[serde(transparent)]
pub struct Tags(pub BTreeSet<String>);
