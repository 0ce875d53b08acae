// Async HTTP client for the myUplink v2 REST API.
//
// Base path: {base_url}/v2/
// Auth: `authorization: Bearer <token>` from a `TokenProvider`, per request.
// Every endpoint call holds a throttle permit from send until the body is read.

use std::sync::Arc;

use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{self, TokenProvider};
use crate::error::Error;
use crate::ids::{DeviceId, ParameterId, SystemId};
use crate::models::{
    DeviceRecord, FirmwareInfoRecord, ITEMS_PER_PAGE, ModeChangeResponse, NotificationRecord,
    NotificationsPage, ParameterRecord, SmartHomeMode, SmartHomeModeBody, Subscription,
    SubscriptionsResponse, SystemRecord, SystemsPage, ZoneRecord,
};
use crate::throttle::Throttle;
use crate::transport::TransportConfig;

/// Content type the API expects on writes.
pub const JSON_PATCH: &str = "application/json-patch+json";

// ── Error response shape ─────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ── Request options ──────────────────────────────────────────────────

/// Extra pieces of a single authorized request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Copied into the request; an `authorization` entry is overwritten.
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn query(mut self, key: &str, value: String) -> Self {
        self.query.push((key.to_owned(), value));
        self
    }

    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

// ── Pagination ───────────────────────────────────────────────────────

trait Page: DeserializeOwned {
    type Item;
    fn into_parts(self) -> (u32, Vec<Self::Item>);
}

impl Page for SystemsPage {
    type Item = SystemRecord;
    fn into_parts(self) -> (u32, Vec<SystemRecord>) {
        (self.num_items, self.systems)
    }
}

impl Page for NotificationsPage {
    type Item = NotificationRecord;
    fn into_parts(self) -> (u32, Vec<NotificationRecord>) {
        (self.num_items, self.notifications)
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the myUplink API.
///
/// Cheaply cloneable. Clones share the HTTP connection pool, the token
/// provider and the throttle gate, so at most one request is in flight
/// across all of them.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_root: Url,
    tokens: Arc<dyn TokenProvider>,
    throttle: Throttle,
    language: Option<HeaderValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_root", &self.api_root.as_str())
            .field("throttle", &self.throttle.delay())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn new(transport: &TransportConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(http, transport, tokens)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        http: reqwest::Client,
        transport: &TransportConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, Error> {
        let language = match transport.language.as_deref() {
            Some(lang) if !lang.trim().is_empty() => Some(HeaderValue::from_str(lang.trim())?),
            _ => None,
        };

        Ok(Self {
            http,
            api_root: transport.api_root()?,
            tokens,
            throttle: Throttle::new(transport.throttle_delay),
            language,
        })
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    // ── Authorized request ───────────────────────────────────────────

    /// Send one authorized request to `{base}/v2/{path}`.
    ///
    /// Does not pass through the throttle; endpoint methods do that.
    /// Transport failures are returned as-is, no retries.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<reqwest::Response, Error> {
        let url = self.api_root.join(path.trim_start_matches('/'))?;

        let token = self.tokens.access_token().await?;
        let mut bearer =
            HeaderValue::from_str(&auth::bearer(&token)).map_err(|e| Error::Token {
                message: format!("access token is not a valid header value: {e}"),
            })?;
        bearer.set_sensitive(true);

        let mut headers = options.headers.clone();
        headers.insert(AUTHORIZATION, bearer);

        debug!("{method} {url}");

        let mut req = self.http.request(method, url).headers(headers);
        if !options.query.is_empty() {
            req = req.query(&options.query);
        }
        if let Some(body) = &options.body {
            req = req.body(body.clone());
        }

        Ok(req.send().await?)
    }

    // ── Gated helpers ────────────────────────────────────────────────

    fn localized(&self, options: RequestOptions) -> RequestOptions {
        match &self.language {
            Some(lang) => options.header(ACCEPT_LANGUAGE, lang.clone()),
            None => options,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, Error> {
        let _permit = self.throttle.acquire().await;
        let resp = self.request(Method::GET, path, &options).await?;
        Self::handle_response(resp).await
    }

    async fn paginate<P: Page>(&self, path: &str, localized: bool) -> Result<Vec<P::Item>, Error> {
        let mut items = Vec::new();
        let mut page = 1_u32;

        loop {
            let mut options = RequestOptions::default()
                .query("page", page.to_string())
                .query("itemsPerPage", ITEMS_PER_PAGE.to_string());
            if localized {
                options = self.localized(options);
            }

            let (total, batch) = self.get_json::<P>(path, options).await?.into_parts();
            let fetched = batch.len();
            items.extend(batch);

            if fetched == 0 || items.len() >= usize::try_from(total).unwrap_or(usize::MAX) {
                break;
            }
            page += 1;
            debug!("{path}: fetched {} of {total}, requesting page {page}", items.len());
        }

        Ok(items)
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Reject non-2xx responses, otherwise hand the response back.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.detail.or(e.message).or(e.title))
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Error::Authentication {
                status: status.as_u16(),
                message,
            }
        } else {
            Error::Http {
                status: status.as_u16(),
                message,
            }
        }
    }

    // ── Systems ──────────────────────────────────────────────────────

    /// All systems visible to the account, following pagination.
    pub async fn list_systems(&self) -> Result<Vec<SystemRecord>, Error> {
        self.paginate::<SystemsPage>("systems/me", false).await
    }

    pub async fn list_active_notifications(
        &self,
        system_id: &SystemId,
    ) -> Result<Vec<NotificationRecord>, Error> {
        self.paginate::<NotificationsPage>(
            &format!("systems/{system_id}/notifications/active"),
            true,
        )
        .await
    }

    pub async fn get_subscriptions(&self, system_id: &SystemId) -> Result<Vec<Subscription>, Error> {
        let resp: SubscriptionsResponse = self
            .get_json(
                &format!("systems/{system_id}/subscriptions"),
                RequestOptions::default(),
            )
            .await?;
        Ok(resp.subscriptions)
    }

    /// Whether the system holds a `manage` subscription.
    pub async fn get_premium_manage(&self, system_id: &SystemId) -> Result<bool, Error> {
        let subscriptions = self.get_subscriptions(system_id).await?;
        Ok(subscriptions.iter().any(Subscription::is_manage))
    }

    pub async fn get_smart_home_mode(&self, system_id: &SystemId) -> Result<SmartHomeMode, Error> {
        let body: SmartHomeModeBody = self
            .get_json(
                &format!("systems/{system_id}/smart-home-mode"),
                RequestOptions::default(),
            )
            .await?;
        Ok(body.smart_home_mode)
    }

    /// Set the smart-home mode. `true` iff HTTP 200 with `payload.state == "ok"`.
    pub async fn put_smart_home_mode(
        &self,
        system_id: &SystemId,
        mode: SmartHomeMode,
    ) -> Result<bool, Error> {
        debug!("put smart home mode {mode} for system {system_id}");
        let body = serde_json::json!({ "smartHomeMode": mode }).to_string();
        let options = RequestOptions::default()
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_PATCH))
            .body(body);

        let _permit = self.throttle.acquire().await;
        let resp = self
            .request(
                Method::PUT,
                &format!("systems/{system_id}/smart-home-mode"),
                &options,
            )
            .await?;
        let resp = Self::check_status(resp).await?;
        if resp.status() != StatusCode::OK {
            return Ok(false);
        }

        let parsed: ModeChangeResponse = Self::handle_response(resp).await?;
        Ok(parsed.is_ok())
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn get_device(&self, device_id: &DeviceId) -> Result<DeviceRecord, Error> {
        self.get_json(&format!("devices/{device_id}"), RequestOptions::default())
            .await
    }

    pub async fn get_firmware_info(&self, device_id: &DeviceId) -> Result<FirmwareInfoRecord, Error> {
        self.get_json(
            &format!("devices/{device_id}/firmware-info"),
            self.localized(RequestOptions::default()),
        )
        .await
    }

    /// Data points of a device. An empty filter fetches every point.
    pub async fn get_points(
        &self,
        device_id: &DeviceId,
        filter: &[ParameterId],
    ) -> Result<Vec<ParameterRecord>, Error> {
        let mut options = self.localized(RequestOptions::default());
        if !filter.is_empty() {
            let joined = filter
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            options = options.query("parameters", joined);
        }
        self.get_json(&format!("devices/{device_id}/points"), options)
            .await
    }

    /// Write one data point. `true` iff the API answered HTTP 200.
    pub async fn patch_point(
        &self,
        device_id: &DeviceId,
        parameter_id: ParameterId,
        value: &str,
    ) -> Result<bool, Error> {
        debug!("patch parameter {parameter_id} on device {device_id} with value {value}");
        let mut body = serde_json::Map::new();
        body.insert(
            parameter_id.to_string(),
            serde_json::Value::String(value.to_owned()),
        );
        let options = RequestOptions::default()
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_PATCH))
            .body(serde_json::Value::Object(body).to_string());

        let _permit = self.throttle.acquire().await;
        let resp = self
            .request(
                Method::PATCH,
                &format!("devices/{device_id}/points"),
                &options,
            )
            .await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.status() == StatusCode::OK)
    }

    pub async fn get_zones(&self, device_id: &DeviceId) -> Result<Vec<ZoneRecord>, Error> {
        self.get_json(
            &format!("devices/{device_id}/smart-home-zones"),
            self.localized(RequestOptions::default()),
        )
        .await
    }
}
