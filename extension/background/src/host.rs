use async_trait::async_trait;
use desktopd_bridge::relay::{ActiveInfo, AttachInfo, DetachInfo, HighlightInfo, MoveInfo, RemoveInfo};
use desktopd_bridge::{
    EventRelay, ExtensionInfo, HostAdapter, HostError, IdentityStore, TabEventSource, TabQuery, TabUpdate,
};
use desktopd_protocol::{Tab, TabEventKind, TabId};
use js_sys::{Object, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::chrome;

/// `chrome.tabs` and `chrome.runtime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

#[async_trait(?Send)]
impl HostAdapter for ChromeTabs {
    async fn query_tabs(&self, query: &TabQuery) -> Result<Vec<Tab>, HostError> {
        let query = to_js("tabs.query", query)?;
        let tabs = JsFuture::from(chrome::tabs_query(&query))
            .await
            .map_err(|e| HostError::rejected("tabs.query", chrome::stringify_js_error(e)))?;
        from_js("tabs.query", tabs)
    }

    async fn update_tab(&self, tab_id: TabId, update: &TabUpdate) -> Result<Tab, HostError> {
        let properties = to_js("tabs.update", update)?;
        let tab = JsFuture::from(chrome::tabs_update(tab_id as f64, &properties))
            .await
            .map_err(|e| HostError::rejected("tabs.update", chrome::stringify_js_error(e)))?;
        from_js("tabs.update", tab)
    }

    async fn extension_info(&self) -> Result<ExtensionInfo, HostError> {
        let manifest = chrome::runtime_get_manifest();
        if manifest.is_undefined() {
            return Err(HostError::unavailable("runtime.getManifest"));
        }
        Ok(ExtensionInfo {
            id: chrome::runtime_id(),
            name: chrome::string_field(&manifest, "name").unwrap_or_default(),
            version: chrome::string_field(&manifest, "version").unwrap_or_default(),
        })
    }
}

impl TabEventSource for ChromeTabs {
    fn subscribe(&self, kind: TabEventKind, relay: EventRelay) {
        match kind {
            TabEventKind::Created => {
                let cb = Closure::<dyn FnMut(JsValue)>::new(move |tab: JsValue| {
                    if let Some(tab) = decode::<Tab>(kind, tab) {
                        relay.on_created(tab);
                    }
                });
                chrome::tabs_on_created(&cb);
                cb.forget();
            }
            TabEventKind::Activated => {
                let cb = Closure::<dyn FnMut(JsValue)>::new(move |info: JsValue| {
                    if let Some(info) = decode::<ActiveInfo>(kind, info) {
                        relay.on_activated(info);
                    }
                });
                chrome::tabs_on_activated(&cb);
                cb.forget();
            }
            TabEventKind::Attached => {
                let cb = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |tab_id: JsValue, info: JsValue| {
                    if let (Some(tab_id), Some(info)) = (tab_id_of(kind, &tab_id), decode::<AttachInfo>(kind, info)) {
                        relay.on_attached(tab_id, info);
                    }
                });
                chrome::tabs_on_attached(&cb);
                cb.forget();
            }
            TabEventKind::Detached => {
                let cb = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |tab_id: JsValue, info: JsValue| {
                    if let (Some(tab_id), Some(info)) = (tab_id_of(kind, &tab_id), decode::<DetachInfo>(kind, info)) {
                        relay.on_detached(tab_id, info);
                    }
                });
                chrome::tabs_on_detached(&cb);
                cb.forget();
            }
            TabEventKind::Highlighted => {
                let cb = Closure::<dyn FnMut(JsValue)>::new(move |info: JsValue| {
                    if let Some(info) = decode::<HighlightInfo>(kind, info) {
                        relay.on_highlighted(info);
                    }
                });
                chrome::tabs_on_highlighted(&cb);
                cb.forget();
            }
            TabEventKind::Moved => {
                let cb = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |tab_id: JsValue, info: JsValue| {
                    if let (Some(tab_id), Some(info)) = (tab_id_of(kind, &tab_id), decode::<MoveInfo>(kind, info)) {
                        relay.on_moved(tab_id, info);
                    }
                });
                chrome::tabs_on_moved(&cb);
                cb.forget();
            }
            TabEventKind::Replaced => {
                let cb = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |added: JsValue, removed: JsValue| {
                    if let (Some(added), Some(removed)) = (tab_id_of(kind, &added), tab_id_of(kind, &removed)) {
                        relay.on_replaced(added, removed);
                    }
                });
                chrome::tabs_on_replaced(&cb);
                cb.forget();
            }
            TabEventKind::Removed => {
                let cb = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |tab_id: JsValue, info: JsValue| {
                    if let (Some(tab_id), Some(info)) = (tab_id_of(kind, &tab_id), decode::<RemoveInfo>(kind, info)) {
                        relay.on_removed(tab_id, info);
                    }
                });
                chrome::tabs_on_removed(&cb);
                cb.forget();
            }
            TabEventKind::Updated => {
                let cb = Closure::<dyn FnMut(JsValue, JsValue, JsValue)>::new(
                    move |tab_id: JsValue, change: JsValue, tab: JsValue| {
                        let change = decode::<serde_json::Value>(kind, change).unwrap_or_default();
                        if let (Some(tab_id), Some(tab)) = (tab_id_of(kind, &tab_id), decode::<Tab>(kind, tab)) {
                            relay.on_updated(tab_id, change, tab);
                        }
                    },
                );
                chrome::tabs_on_updated(&cb);
                cb.forget();
            }
        }
    }
}

/// `chrome.storage.local`, one string per key.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

impl ChromeStorage {
    pub async fn get_value(&self, key: &str) -> Result<JsValue, HostError> {
        let items = JsFuture::from(chrome::storage_local_get(&JsValue::from_str(key)))
            .await
            .map_err(|e| HostError::rejected("storage.local.get", chrome::stringify_js_error(e)))?;
        Reflect::get(&items, &JsValue::from_str(key))
            .map_err(|e| HostError::rejected("storage.local.get", chrome::stringify_js_error(e)))
    }
}

#[async_trait(?Send)]
impl IdentityStore for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, HostError> {
        Ok(self.get_value(key).await?.as_string())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), HostError> {
        let items = Object::new();
        Reflect::set(&items, &JsValue::from_str(key), &JsValue::from_str(value))
            .map_err(|e| HostError::rejected("storage.local.set", chrome::stringify_js_error(e)))?;
        JsFuture::from(chrome::storage_local_set(&items))
            .await
            .map_err(|e| HostError::rejected("storage.local.set", chrome::stringify_js_error(e)))?;
        Ok(())
    }
}

fn to_js<T: Serialize>(operation: &'static str, value: &T) -> Result<JsValue, HostError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| HostError::rejected(operation, e.to_string()))
}

fn from_js<T: DeserializeOwned>(operation: &'static str, value: JsValue) -> Result<T, HostError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| HostError::rejected(operation, e.to_string()))
}

fn decode<T: DeserializeOwned>(kind: TabEventKind, value: JsValue) -> Option<T> {
    match serde_wasm_bindgen::from_value(value) {
        Ok(v) => Some(v),
        Err(err) => {
            warn!(target = "desktopd", %kind, error = %err, "unexpected tab event payload");
            None
        }
    }
}

fn tab_id_of(kind: TabEventKind, value: &JsValue) -> Option<TabId> {
    let id = value.as_f64().map(|v| v as TabId);
    if id.is_none() {
        warn!(target = "desktopd", %kind, "tab event without numeric tab id");
    }
    id
}
