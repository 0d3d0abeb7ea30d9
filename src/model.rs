use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Scheme is optional, the host needs at least one dot. Word characters are
/// ASCII only.
static DOWNLOAD_URL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?:http(s)?://)?[[:word:].-]+(?:\.[[:word:].-]+)+[[:word:]\-_~:/?#\[\]@!$&'()*+,;=.]+$",
  )
  .expect("download url pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
  #[error("{0} must be specified")]
  MissingField(&'static str),
  #[error("{0} does not look like a valid URL")]
  MalformedField(&'static str),
}

impl ValidationError {
  pub fn field(&self) -> &'static str {
    match self {
      Self::MissingField(field) | Self::MalformedField(field) => field,
    }
  }
}

/// Explicit `null` reads as the zero value, same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One published build of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseEvent {
  #[serde(deserialize_with = "null_as_default")]
  pub event: String,
  #[serde(rename = "buildId", deserialize_with = "null_as_default")]
  pub build_id: i64,
  #[serde(deserialize_with = "null_as_default")]
  pub branch: String,
  #[serde(rename = "downloadUrl", deserialize_with = "null_as_default")]
  pub download_url: String,
  #[serde(rename = "productName", deserialize_with = "null_as_default")]
  pub product_name: String,
  /// RFC 3339, stamped at ingest time.
  #[serde(deserialize_with = "null_as_default")]
  pub timestamp: String,
  /// Left out of stored items and responses when absent.
  #[serde(rename = "buildSHA", skip_serializing_if = "Option::is_none")]
  pub build_sha: Option<String>,
}

impl ReleaseEvent {
  /// Checks run in order and the first failure wins.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.product_name.is_empty() {
      return Err(ValidationError::MissingField("productName"));
    }
    if self.download_url.is_empty() {
      return Err(ValidationError::MissingField("downloadUrl"));
    }
    if !DOWNLOAD_URL.is_match(&self.download_url) {
      return Err(ValidationError::MalformedField("downloadUrl"));
    }
    if self.branch.is_empty() {
      return Err(ValidationError::MissingField("branch"));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
  #[serde(deserialize_with = "null_as_default")]
  pub branch: String,
  #[serde(rename = "productName", deserialize_with = "null_as_default")]
  pub product_name: String,
  #[serde(rename = "alwaysShowMaster", deserialize_with = "null_as_default")]
  pub always_show_master: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn event() -> ReleaseEvent {
    ReleaseEvent {
      event: "test".into(),
      build_id: 123,
      branch: "somebranch".into(),
      download_url: "https://someurl.server.com/path".into(),
      product_name: "some product".into(),
      ..Default::default()
    }
  }

  #[test]
  fn test_valid_event() {
    assert_eq!(event().validate(), Ok(()));
  }

  #[test]
  fn test_scheme_is_optional() {
    let ev = ReleaseEvent {
      download_url: "cdn.example.com/widget.zip".into(),
      ..event()
    };
    assert_eq!(ev.validate(), Ok(()));
  }

  #[test]
  fn test_empty_branch() {
    let ev = ReleaseEvent { branch: String::new(), ..event() };
    assert_eq!(ev.validate(), Err(ValidationError::MissingField("branch")));
  }

  #[test]
  fn test_empty_product_name() {
    let ev = ReleaseEvent { product_name: String::new(), ..event() };
    assert_eq!(
      ev.validate(),
      Err(ValidationError::MissingField("productName"))
    );
  }

  #[test]
  fn test_empty_download_url() {
    let ev = ReleaseEvent { download_url: String::new(), ..event() };
    assert_eq!(
      ev.validate(),
      Err(ValidationError::MissingField("downloadUrl"))
    );
  }

  #[test]
  fn test_malformed_download_url() {
    let ev = ReleaseEvent { download_url: "malformedurl!".into(), ..event() };
    let err = ev.validate().unwrap_err();

    assert_eq!(err, ValidationError::MalformedField("downloadUrl"));
    assert_eq!(err.field(), "downloadUrl");
    assert_eq!(err.to_string(), "downloadUrl does not look like a valid URL");
  }

  #[test]
  fn test_first_failure_wins() {
    let ev = ReleaseEvent {
      product_name: String::new(),
      branch: String::new(),
      download_url: "nope".into(),
      ..event()
    };
    assert_eq!(
      ev.validate(),
      Err(ValidationError::MissingField("productName"))
    );
  }

  #[test]
  fn test_malformed_url_reported_before_empty_branch() {
    let ev = ReleaseEvent {
      download_url: "malformedurl!".into(),
      branch: String::new(),
      ..event()
    };
    assert_eq!(
      ev.validate(),
      Err(ValidationError::MalformedField("downloadUrl"))
    );
  }

  #[test]
  fn test_empty_url_reported_before_empty_branch() {
    let ev = ReleaseEvent {
      download_url: String::new(),
      branch: String::new(),
      ..event()
    };
    assert_eq!(
      ev.validate(),
      Err(ValidationError::MissingField("downloadUrl"))
    );
  }

  #[test]
  fn test_non_ascii_host_is_malformed() {
    for url in ["a.éé", "例え.テスト/パス"] {
      let ev = ReleaseEvent { download_url: url.into(), ..event() };
      assert_eq!(
        ev.validate(),
        Err(ValidationError::MalformedField("downloadUrl")),
        "{url}"
      );
    }
  }

  #[test]
  fn test_null_fields_read_as_empty() {
    let ev: ReleaseEvent = json::from_str(
      r#"{"productName":"w","branch":null,"buildId":null,"downloadUrl":"https://cdn.example.com/w.zip"}"#,
    )
    .unwrap();

    assert_eq!(ev.branch, "");
    assert_eq!(ev.build_id, 0);
    assert_eq!(ev.validate(), Err(ValidationError::MissingField("branch")));

    let req: SearchRequest = json::from_str(
      r#"{"productName":"w","branch":"dev","alwaysShowMaster":null}"#,
    )
    .unwrap();
    assert!(!req.always_show_master);
  }

  #[test]
  fn test_missing_fields_take_defaults() {
    let ev: ReleaseEvent = json::from_str(
      r#"{"productName":"widget","branch":"dev","downloadUrl":"https://cdn.example.com/widget.zip"}"#,
    )
    .unwrap();

    assert_eq!(ev.build_id, 0);
    assert_eq!(ev.event, "");
    assert_eq!(ev.build_sha, None);
    assert_eq!(ev.validate(), Ok(()));
  }

  #[test]
  fn test_wire_names() {
    let ev = ReleaseEvent { build_sha: Some("abc123".into()), ..event() };
    let value = json::to_value(&ev).unwrap();

    assert_eq!(value["buildId"], 123);
    assert_eq!(value["downloadUrl"], "https://someurl.server.com/path");
    assert_eq!(value["productName"], "some product");
    assert_eq!(value["buildSHA"], "abc123");

    let value = json::to_value(event()).unwrap();
    assert!(value.get("buildSHA").is_none());
  }

  #[test]
  fn test_search_request_defaults() {
    let req: SearchRequest =
      json::from_str(r#"{"productName":"widget","branch":"dev"}"#).unwrap();

    assert_eq!(req.product_name, "widget");
    assert!(!req.always_show_master);
  }
}
