use json::Value;

use crate::{
  model::ReleaseEvent,
  prelude::*,
  store::{Item, Query, Store, StoreError},
};

pub struct Releases<'a> {
  store: &'a dyn Store,
}

impl<'a> Releases<'a> {
  pub fn new(store: &'a dyn Store) -> Self {
    Self { store }
  }

  /// Single unconditional put. Resubmitting an event stores a duplicate.
  pub async fn log_release(
    &self,
    table: &str,
    event: &ReleaseEvent,
  ) -> Result<()> {
    let item = to_item(event).map_err(Error::StoreWrite)?;

    if let Err(err) = self.store.put(table, item).await {
      error!("Could not put item to table {table}: {err}");
      return Err(Error::StoreWrite(err));
    }

    info!(
      "Recorded {} build {} on {} in {table}",
      event.product_name, event.build_id, event.branch
    );
    Ok(())
  }

  /// Highest `buildId` for the product on the branch, `None` when there is
  /// no such release.
  pub async fn most_recent(
    &self,
    table: &str,
    product_name: &str,
    branch: &str,
  ) -> Result<Option<ReleaseEvent>> {
    let query =
      Query::partition(product_name).descending().filter_eq("branch", branch);

    let output = match self.store.query(table, query).await {
      Ok(output) => output,
      Err(err) => {
        error!("Could not query table {table}: {err}");
        return Err(Error::StoreQuery(err));
      }
    };

    debug!("{product_name}/{branch}: {} matching records", output.count);

    let Some(item) = output.items.into_iter().next() else {
      return Ok(None);
    };

    let event = json::from_value(Value::Object(item))
      .map_err(|err| Error::StoreQuery(StoreError::Backend(err.to_string())))?;
    Ok(Some(event))
  }
}

fn to_item(event: &ReleaseEvent) -> Result<Item, StoreError> {
  match json::to_value(event) {
    Ok(Value::Object(item)) => Ok(item),
    Ok(_) => Err(StoreError::Backend("release is not an object".into())),
    Err(err) => Err(StoreError::Backend(err.to_string())),
  }
}

#[cfg(test)]
mod tests {
  use json::json;

  use super::*;
  use crate::store::{MemoryStore, QueryOutput, TableSchema};

  /// Answers by table name: `successtest` accepts writes, `recordstest`
  /// returns three pre-sorted releases, `emptytest` nothing, and anything
  /// else fails.
  struct MockStore;

  fn release(build_id: i64) -> ReleaseEvent {
    ReleaseEvent {
      event: "test".into(),
      build_id,
      branch: "somebranch".into(),
      download_url: format!("https://some/url/{build_id}"),
      product_name: "test product".into(),
      ..Default::default()
    }
  }

  #[async_trait]
  impl Store for MockStore {
    async fn ensure_table(
      &self,
      _table: &str,
      _schema: TableSchema,
    ) -> Result<(), StoreError> {
      Ok(())
    }

    async fn put(&self, table: &str, _item: Item) -> Result<(), StoreError> {
      match table {
        "successtest" => Ok(()),
        _ => Err(StoreError::Backend("kaboom!".into())),
      }
    }

    async fn query(
      &self,
      table: &str,
      _query: Query,
    ) -> Result<QueryOutput, StoreError> {
      match table {
        "recordstest" => Ok(QueryOutput::new(
          [26, 25, 24].map(|id| to_item(&release(id)).unwrap()).to_vec(),
        )),
        "emptytest" => Ok(QueryOutput::default()),
        _ => Err(StoreError::Backend("Kaboom!".into())),
      }
    }
  }

  #[tokio::test]
  async fn test_log_release() {
    let sv = Releases::new(&MockStore);
    let event = ReleaseEvent {
      build_id: 1234,
      branch: "master".into(),
      download_url: "https://some/url".into(),
      ..release(0)
    };

    assert!(sv.log_release("successtest", &event).await.is_ok());
    assert!(matches!(
      sv.log_release("failtest", &event).await,
      Err(Error::StoreWrite(_))
    ));
  }

  #[tokio::test]
  async fn test_most_recent_takes_first_row() {
    let sv = Releases::new(&MockStore);

    let result = sv
      .most_recent("recordstest", "test product", "somebranch")
      .await
      .unwrap()
      .unwrap();

    assert_eq!(result.product_name, "test product");
    assert_eq!(result.download_url, "https://some/url/26");
    assert_eq!(result.branch, "somebranch");
    assert_eq!(result.build_id, 26);
  }

  #[tokio::test]
  async fn test_most_recent_empty() {
    let sv = Releases::new(&MockStore);
    let result =
      sv.most_recent("emptytest", "test product", "somebranch").await;

    assert!(matches!(result, Ok(None)));
  }

  #[tokio::test]
  async fn test_most_recent_failure() {
    let sv = Releases::new(&MockStore);
    let result = sv.most_recent("failtest", "test product", "somebranch").await;

    assert!(matches!(result, Err(Error::StoreQuery(_))));
  }

  #[tokio::test]
  async fn test_most_recent_ignores_insert_order() {
    let store = MemoryStore::new();
    store
      .ensure_table("releases", TableSchema::new("productName", "buildId"))
      .await
      .unwrap();
    let sv = Releases::new(&store);

    for id in [25, 26, 24] {
      sv.log_release("releases", &release(id)).await.unwrap();
    }
    sv.log_release(
      "releases",
      &ReleaseEvent { branch: "other".into(), ..release(40) },
    )
    .await
    .unwrap();

    let result = sv
      .most_recent("releases", "test product", "somebranch")
      .await
      .unwrap()
      .unwrap();

    assert_eq!(result.build_id, 26);
    assert_eq!(result.download_url, "https://some/url/26");
  }

  #[tokio::test]
  async fn test_fields_stored_verbatim() {
    let store = MemoryStore::new();
    store
      .ensure_table("releases", TableSchema::new("productName", "buildId"))
      .await
      .unwrap();

    let event = ReleaseEvent { build_sha: Some("deadbeef".into()), ..release(3) };
    Releases::new(&store).log_release("releases", &event).await.unwrap();

    let out = store
      .query("releases", Query::partition("test product"))
      .await
      .unwrap();
    assert_eq!(out.items[0]["buildSHA"], json!("deadbeef"));
    assert_eq!(out.items[0]["downloadUrl"], json!("https://some/url/3"));
  }
}
