use axum::{Json, body::Bytes, extract::State, http::StatusCode};

use crate::{
  model::{ReleaseEvent, SearchRequest},
  prelude::*,
  state::AppState,
};

const MASTER: &str = "master";

fn parse<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
  json::from_slice(body).map_err(|err| {
    warn!("Could not unmarshal request body: {err}");
    Error::Parse(err)
  })
}

pub async fn ingest(
  State(app): State<Arc<AppState>>,
  body: Bytes,
) -> Result<StatusCode> {
  debug!("Body size is {}", body.len());

  let mut release: ReleaseEvent = parse(&body)?;

  if let Err(err) = release.validate() {
    warn!("Incoming JSON was not valid ({}): {err}", err.field());
    return Err(err.into());
  }

  if app.config.verify_content {
    app.sv().content.verify(&release.download_url).await?;
  }

  release.timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

  app.sv().releases.log_release(&app.config.table, &release).await?;
  Ok(StatusCode::CREATED)
}

pub async fn lookup(
  State(app): State<Arc<AppState>>,
  body: Bytes,
) -> Result<Json<Vec<Option<ReleaseEvent>>>> {
  let req: SearchRequest = parse(&body)?;

  let sv = app.sv();
  let table = app.config.table.as_str();
  let primary = sv.releases.most_recent(table, &req.product_name, &req.branch);

  let results = if req.always_show_master && req.branch != MASTER {
    let master = sv.releases.most_recent(table, &req.product_name, MASTER);
    let (primary, master) = tokio::try_join!(primary, master)?;
    vec![primary, master]
  } else if req.always_show_master {
    let primary = primary.await?;
    vec![primary.clone(), primary]
  } else {
    vec![primary.await?]
  };

  if results[0].is_none() {
    return Err(Error::NotFound);
  }

  Ok(Json(results))
}

pub async fn health() -> &'static str {
  "OK"
}
