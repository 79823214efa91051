use chrono::{DateTime, TimeDelta, Utc};
use countgrid_core::{GridError, PreferenceStore, Preferences, Result};
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

/// Preferences kept in a first-party cookie that lives for a year.
#[derive(Debug)]
pub(crate) struct CookiePreferenceStore {
    document: Option<HtmlDocument>,
}

impl CookiePreferenceStore {
    pub(crate) const NAME: &'static str = "countgrid_prefs";
    pub(crate) const LIFETIME: TimeDelta = TimeDelta::days(365);

    pub(crate) fn new() -> Self {
        let document = gloo::utils::document().dyn_into::<HtmlDocument>().ok();
        if document.is_none() {
            log::warn!("not an html document, preferences will not persist");
        }
        Self { document }
    }

    #[cfg(test)]
    pub(crate) const fn detached() -> Self {
        Self { document: None }
    }

    fn read_raw(&self) -> Option<String> {
        let cookies = self.document.as_ref()?.cookie().ok()?;
        let encoded = find_cookie(&cookies, Self::NAME)?;
        js_sys::decode_uri_component(encoded).ok().map(String::from)
    }
}

impl PreferenceStore for CookiePreferenceStore {
    fn load(&self) -> Option<Preferences> {
        self.read_raw()
            .as_deref()
            .and_then(Preferences::from_json)
    }

    fn save(&mut self, prefs: &Preferences) -> Result<()> {
        let document = self.document.as_ref().ok_or(GridError::PreferenceStore)?;
        let value = String::from(js_sys::encode_uri_component(&prefs.to_json()));
        let cookie = format_cookie(Self::NAME, &value, now(), Self::LIFETIME);
        log::debug!("writing cookie: {}", cookie);
        document.set_cookie(&cookie).map_err(|err| {
            log::error!("failed to write cookie: {:?}", err);
            GridError::PreferenceStore
        })
    }
}

fn now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Looks up `name` in a `document.cookie` style `a=1; b=2` listing.
fn find_cookie<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find_map(|(key, value)| (key == name).then_some(value))
}

fn format_cookie(name: &str, value: &str, now: DateTime<Utc>, lifetime: TimeDelta) -> String {
    let expires = now.checked_add_signed(lifetime).unwrap_or(now);
    format!(
        "{}={}; max-age={}; expires={}; path=/; SameSite=Lax",
        name,
        value,
        lifetime.num_seconds(),
        expires.format("%a, %d %b %Y %H:%M:%S GMT"),
    )
}
