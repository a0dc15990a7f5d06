use std::time::Duration;

use desktopd_bridge::Timer;
use futures::future::LocalBoxFuture;
use js_sys::Promise;
use wasm_bindgen_futures::JsFuture;

use crate::chrome;

/// `setTimeout` wrapped in a promise.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
        let ms = delay.as_millis().min(i32::MAX as u128) as i32;
        let promise = Promise::new(&mut |resolve, _reject| {
            chrome::set_timeout(&resolve, ms);
        });
        Box::pin(async move {
            let _ = JsFuture::from(promise).await;
        })
    }
}
