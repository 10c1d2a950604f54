use crate::api::config_from_js;
use crate::error;
use crate::interop::{new_obj, set_kv};
use floorplan::counter::{parse_count, session_visit, visits_from_body, CounterStore, Visit};
use floorplan::{html, CounterConfig, Error, Result};
use gloo_net::http::Request;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Storage;

fn storage_err(e: JsValue) -> Error {
    Error::backend("localStorage", format!("{:?}", e))
}

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| Error::backend("browser", "no window"))
}

/// The counter kept in this browser's `localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self> {
        let storage = window()?
            .local_storage()
            .map_err(storage_err)?
            .ok_or_else(|| Error::backend("localStorage", "unavailable"))?;
        Ok(LocalStorageStore { storage })
    }
}

impl CounterStore for LocalStorageStore {
    fn name(&self) -> &'static str {
        "localStorage"
    }

    fn get(&self, key: &str) -> Result<u64> {
        let raw = self.storage.get_item(key).map_err(storage_err)?;
        Ok(parse_count(raw.as_deref()))
    }

    fn increment(&mut self, key: &str) -> Result<u64> {
        let v = self.get(key)?.saturating_add(1);
        self.storage.set_item(key, &v.to_string()).map_err(storage_err)?;
        Ok(v)
    }

    fn reset(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(storage_err)
    }
}

fn session_flag_key(key: &str) -> String {
    format!("{key}-counted")
}

fn session_storage() -> Option<Storage> {
    web_sys::window()?.session_storage().ok().flatten()
}

fn session_counted(key: &str) -> bool {
    session_storage()
        .and_then(|s| s.get_item(&session_flag_key(key)).ok().flatten())
        .is_some()
}

fn mark_session_counted(key: &str) {
    if let Some(s) = session_storage() {
        let _ = s.set_item(&session_flag_key(key), "1");
    }
}

/// `POST` counts a visit, `GET` only reads.
async fn http_visits(url: &str, count: bool) -> Result<u64> {
    let req = if count { Request::post(url) } else { Request::get(url) };
    let resp = req.send().await.map_err(|e| Error::backend("http", e.to_string()))?;
    if !resp.ok() {
        return Err(Error::backend("http", format!("{url}: HTTP {}", resp.status())));
    }
    let text = resp.text().await.map_err(|e| Error::backend("http", e.to_string()))?;
    let body: serde_json::Value = serde_json::from_str(&text)?;
    visits_from_body(&body)
}

/// Counts this page view once per browser session, trying the table
/// endpoint, then the key-value endpoint, then `localStorage`.
pub async fn visit(config: &CounterConfig) -> Result<(Visit, &'static str)> {
    let counted = session_counted(&config.key);
    let endpoints = [
        ("table", config.table_endpoint.as_deref()),
        ("kv", config.kv_endpoint.as_deref()),
    ];
    for (name, url) in endpoints {
        let Some(url) = url else { continue };
        match http_visits(url, !counted).await {
            Ok(visits) => {
                mark_session_counted(&config.key);
                return Ok((Visit { visits, counted: !counted }, name));
            }
            Err(e) => log::warn!("visit counter: {} endpoint unavailable: {}", name, e),
        }
    }
    if config.use_local_storage {
        match LocalStorageStore::open().and_then(|mut s| session_visit(&mut s, &config.key, counted)) {
            Ok(v) => {
                mark_session_counted(&config.key);
                return Ok((v, "localStorage"));
            }
            Err(e) => log::warn!("visit counter: localStorage unavailable: {}", e),
        }
    }
    Err(Error::AllBackendsFailed)
}

/// Appends the visit label to the page footer, if there is one.
pub fn show_visits(visits: u64) -> std::result::Result<(), JsValue> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(());
    };
    let Some(footer) = document.query_selector(".global-footer .footer-content")? else {
        return Ok(());
    };
    let span = document.create_element("span")?;
    span.set_class_name("visit-counter");
    span.set_inner_html(&html::visit_label_html(visits));
    footer.append_child(&span)?;
    Ok(())
}

/// Resolves to `{ ok, value: { visits, counted, source } }`.
#[wasm_bindgen]
pub async fn count_visit(config: JsValue) -> std::result::Result<JsValue, JsValue> {
    let config = config_from_js(config)?.counter;
    Ok(match visit(&config).await {
        Ok((v, source)) => {
            let o = new_obj();
            set_kv(&o, "visits", &JsValue::from_f64(v.visits as f64));
            set_kv(&o, "counted", &JsValue::from_bool(v.counted));
            set_kv(&o, "source", &JsValue::from_str(source));
            error::ok(o.into())
        }
        Err(e) => error::from_error(&e),
    })
}

/// Counts the visit in the background and shows it in the footer.
#[wasm_bindgen]
pub fn start_visit_counter(config: JsValue) -> std::result::Result<(), JsValue> {
    let config = config_from_js(config)?.counter;
    spawn_local(async move {
        match visit(&config).await {
            Ok((v, source)) => {
                log::info!("visit counter: {} visits ({})", v.visits, source);
                if let Err(e) = show_visits(v.visits) {
                    log::error!("visit counter: footer update failed: {:?}", e);
                }
            }
            Err(e) => log::error!("visit counter: {}", e),
        }
    });
    Ok(())
}

/// Clears the local counter and this session's flag.
#[wasm_bindgen]
pub fn reset_visit_counter(key: Option<String>) -> bool {
    let key = key.unwrap_or_else(|| floorplan::VISITS_KEY.to_string());
    if let Some(s) = session_storage() {
        let _ = s.remove_item(&session_flag_key(&key));
    }
    let reset = LocalStorageStore::open().and_then(|mut s| s.reset(&key));
    if let Err(e) = &reset {
        log::warn!("visit counter: reset failed: {}", e);
    }
    reset.is_ok()
}
